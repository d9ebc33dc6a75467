//! Filename rules that tell invariant resource files from culture files.
//!
//! `Strings.resx` is an invariant (default culture) file; `Strings.fr.resx`
//! and `Strings.pt-BR.resx` are culture files. Classification looks only at
//! the file name and is recomputed on every call.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use unic_langid::LanguageIdentifier;

use crate::formats::RESX_EXTENSION;

lazy_static! {
    static ref RESX_FILE_REGEX: Regex = Regex::new(r"(?i)^.*\.resx$").unwrap();
    static ref CULTURE_FILE_REGEX: Regex =
        Regex::new(r"(?i)^(?P<base>.*)\.(?P<culture>[^.]*)\.resx$").unwrap();
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Whether the file name ends in `.resx` (case-insensitive).
pub fn is_resx_file(path: &Path) -> bool {
    file_name(path).is_some_and(|name| RESX_FILE_REGEX.is_match(name))
}

/// Whether the file name has a culture segment, as in `name.culture.resx`.
pub fn is_culture_file(path: &Path) -> bool {
    file_name(path).is_some_and(|name| CULTURE_FILE_REGEX.is_match(name))
}

/// Whether the file is a `.resx` file without a culture segment.
pub fn is_invariant_file(path: &Path) -> bool {
    is_resx_file(path) && !is_culture_file(path)
}

/// The culture segment of a culture file, if it parses as a language identifier.
pub fn culture_of(path: &Path) -> Option<LanguageIdentifier> {
    let name = file_name(path)?;
    let captures = CULTURE_FILE_REGEX.captures(name)?;
    captures["culture"].parse().ok()
}

/// Maps `dir/name.resx` to `dir/name.<culture>.resx`.
///
/// Returns `None` when `invariant` is not an invariant resource file.
pub fn culture_file_path(invariant: &Path, culture: &str) -> Option<PathBuf> {
    if !is_invariant_file(invariant) {
        return None;
    }
    let name = file_name(invariant)?;
    // the extension is ASCII, so slicing off its byte length is safe
    let stem = &name[..name.len() - RESX_EXTENSION.len() - 1];
    let extension = &name[stem.len() + 1..];
    Some(invariant.with_file_name(format!("{stem}.{culture}.{extension}")))
}

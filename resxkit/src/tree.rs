//! Directory tree walking: mirroring a source tree into a target tree and
//! discovering invariant resource files.
//!
//! All walks are sequential and depth-first. Directory entries are visited in
//! file name order so results are stable across platforms.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::{classify::is_invariant_file, error::Error};

/// Files and subdirectories directly inside one directory, sorted by name.
struct Listing {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

/// Symlinked files count as files; symlinked directories are not descended into.
fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn list_directory(dir: &Path) -> Result<Listing, Error> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else if is_file_entry(&entry) {
            files.push(entry.into_path());
        }
    }

    Ok(Listing { files, dirs })
}

/// Reproduces the structure of `source` under `target`, calling `action` for
/// every file accepted by `filter`.
///
/// `action` receives the source file and the path at the same relative
/// location under `target`. A target directory is created only when its
/// source directory holds at least one accepted file, so branches without
/// matching files are not reproduced. Returns the number of files handed to
/// `action`.
pub fn mirror<F, A>(
    source: &Path,
    target: &Path,
    filter: &F,
    action: &mut A,
) -> Result<usize, Error>
where
    F: Fn(&Path) -> bool,
    A: FnMut(&Path, &Path) -> Result<(), Error>,
{
    let listing = list_directory(source)?;
    let matching: Vec<&PathBuf> = listing
        .files
        .iter()
        .filter(|p| filter(p.as_path()))
        .collect();

    if !matching.is_empty() && !target.is_dir() {
        debug!("creating directory {}", target.display());
        fs::create_dir_all(target)?;
    }

    let mut processed = 0;
    for source_file in matching {
        let relative = source_file.strip_prefix(source).map_err(|_| {
            Error::invalid_resource(format!(
                "{} is outside {}",
                source_file.display(),
                source.display()
            ))
        })?;
        let target_file = target.join(relative);
        action(source_file.as_path(), target_file.as_path())?;
        processed += 1;
    }

    for source_dir in &listing.dirs {
        let Some(name) = source_dir.file_name() else {
            continue;
        };
        processed += mirror(source_dir, &target.join(name), filter, action)?;
    }

    Ok(processed)
}

/// Recursively lists every file under `root` accepted by `predicate`.
///
/// Files are returned depth-first, each directory's entries in name order.
pub fn list_files<F>(root: &Path, predicate: &F) -> Result<Vec<PathBuf>, Error>
where
    F: Fn(&Path) -> bool,
{
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by(|a, b| {
        // files before subdirectories, matching the order `mirror` visits them
        (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
    }) {
        let entry = entry?;
        if is_file_entry(&entry) && predicate(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Recursively lists the invariant `.resx` files under `root`.
pub fn list_invariant_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    list_files(root, &is_invariant_file)
}

/// Deletes everything inside `dir`, keeping `dir` itself.
pub fn clear_directory(dir: &Path) -> Result<(), Error> {
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    for entry in entries {
        if entry.file_type().is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

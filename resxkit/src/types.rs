//! Core types for resxkit.
//! The `.resx` codec decodes into these; the encoder serializes these.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Type name `.resx` writers use for plain strings when they spell it out.
pub const STRING_TYPE_NAME: &str = "System.String";

/// Type prefix that marks a `<data>` node as a reference to an external file.
pub const FILE_REF_TYPE_NAME: &str = "System.Resources.ResXFileRef, System.Windows.Forms";

/// A single `<data>` node of a resource file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    /// Resource key, unique within one file.
    pub key: String,

    /// The raw `<value>` text, `None` when the node has no `<value>` element.
    #[serde(default)]
    pub value: Option<String>,

    /// Free-text comment for translators. Empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    /// The `type` attribute, if any. Plain strings usually omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// The `mimetype` attribute, set for serialized binary payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Pointer to an external file, for `ResXFileRef` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ref: Option<FileRef>,
}

impl Entry {
    /// Creates a plain string entry.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Entry {
            key: key.into(),
            value: Some(value.into()),
            comment: String::new(),
            type_name: None,
            mime_type: None,
            file_ref: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// The type of the payload this entry resolves to.
    ///
    /// For file references this is the type of the referenced file, not the
    /// `ResXFileRef` wrapper.
    pub fn declared_type(&self) -> &str {
        match (&self.file_ref, &self.type_name) {
            (Some(file_ref), _) => &file_ref.type_name,
            (None, Some(type_name)) => type_name,
            (None, None) => STRING_TYPE_NAME,
        }
    }

    /// Whether this entry holds inline translatable text.
    pub fn is_text_string(&self) -> bool {
        if self.file_ref.is_some() || self.mime_type.is_some() {
            return false;
        }
        let declared = self.declared_type();
        declared == STRING_TYPE_NAME || declared.starts_with("System.String,")
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entry {{ key: {}, value: {}, type: {} }}",
            self.key,
            self.value.as_deref().unwrap_or("<none>"),
            self.declared_type()
        )
    }
}

/// The payload of a `ResXFileRef` node: `path;type[;encoding]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileRef {
    /// Path to the referenced file, usually relative to the `.resx` file.
    pub path: String,

    /// Assembly-qualified type of the referenced payload.
    pub type_name: String,

    /// Text encoding for text file references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl FileRef {
    /// Parses the `<value>` text of a file reference node.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        let (path, rest) = match raw.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted.find('"').ok_or_else(|| {
                    Error::invalid_resource(format!("unterminated quoted file reference: {raw}"))
                })?;
                let rest = quoted[end + 1..].trim_start();
                (&quoted[..end], rest.strip_prefix(';').unwrap_or(rest))
            }
            None => match raw.split_once(';') {
                Some((path, rest)) => (path, rest),
                None => (raw, ""),
            },
        };

        let mut parts = rest.splitn(2, ';');
        let type_name = parts.next().map(str::trim).unwrap_or_default();
        if path.is_empty() || type_name.is_empty() {
            return Err(Error::invalid_resource(format!(
                "file reference must be `path;type[;encoding]`, got `{raw}`"
            )));
        }
        let encoding = parts
            .next()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok(FileRef {
            path: path.to_string(),
            type_name: type_name.to_string(),
            encoding,
        })
    }

    /// Resolves the referenced path against a base directory.
    ///
    /// Absolute references are returned as-is. Backslash separators are
    /// normalised so references authored on Windows resolve elsewhere.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        let normalised: PathBuf = self.path.split(['\\', '/']).collect();
        if Path::new(&self.path).is_absolute() {
            PathBuf::from(&self.path)
        } else {
            base.join(normalised)
        }
    }
}

impl Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.contains(';') {
            write!(f, "\"{}\";{}", self.path, self.type_name)?;
        } else {
            write!(f, "{};{}", self.path, self.type_name)?;
        }
        if let Some(encoding) = &self.encoding {
            write!(f, ";{}", encoding)?;
        }
        Ok(())
    }
}

/// A `<resheader>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResHeader {
    pub name: String,
    pub value: String,
}

/// An `<assembly>` alias declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssemblyRef {
    pub alias: Option<String>,
    pub name: String,
}

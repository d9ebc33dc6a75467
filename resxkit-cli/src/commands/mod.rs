//! The built-in commands.

mod export;
mod generate;
mod import;

use std::path::Path;

use crate::parameter::Value;

pub use export::ExportResxCommand;
pub use generate::{GenerateResxCommand, GenerateSummary};
pub use import::ImportResxCommand;

/// Accepts blank strings, which validation reports as missing, and paths of existing directories.
fn is_existing_directory(value: &Value) -> bool {
    match value {
        Value::String(Some(path)) => Path::new(path).is_dir(),
        Value::String(None) => true,
        _ => false,
    }
}

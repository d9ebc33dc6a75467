#![forbid(unsafe_code)]
//! Toolkit for .NET `.resx` localization resource trees.
//!
//! Reads and writes `.resx` files through a small entry model, classifies
//! invariant and culture files by name, mirrors directory trees and
//! pseudo-translates strings for visual localization testing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resxkit::{ResxFormat, Parser, pseudo::pseudo_translate};
//!
//! let mut format = ResxFormat::read_from("Properties/Strings.resx")?;
//! for entry in &mut format.entries {
//!     if entry.is_text_string() {
//!         entry.value = entry.value.as_deref().map(pseudo_translate);
//!     }
//! }
//! format.write_to("Properties/Strings.ja.resx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod error;
pub mod formats;
pub mod pseudo;
pub mod traits;
pub mod tree;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    formats::ResxFormat,
    traits::Parser,
    types::{AssemblyRef, Entry, FileRef, ResHeader},
};

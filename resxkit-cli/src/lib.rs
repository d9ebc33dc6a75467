//! CLI library for testing purposes

pub mod command;
pub mod commands;
pub mod error;
pub mod parameter;
pub mod registry;
pub mod usage;

pub use command::{Command, Outcome};
pub use error::CliError;
pub use registry::{Registry, prepare_arguments, run};

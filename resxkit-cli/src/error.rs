//! Errors that abort a resxkit invocation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid syntax at `{0}`: a command must come before its parameters")]
    Syntax(String),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("invalid value `{value}` for parameter `{switch}`")]
    InvalidParameterValue { switch: String, value: String },

    #[error("parameter `{0}` was given more than once")]
    DuplicateParameter(String),

    #[error("command `{command}` requires parameter `{parameter}`")]
    MissingRequiredParameter {
        command: &'static str,
        parameter: &'static str,
    },

    #[error("only one command can be run per invocation")]
    MultipleCommands,

    #[error("no command given")]
    CommandRequired,

    #[error(transparent)]
    Resource(#[from] resxkit::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

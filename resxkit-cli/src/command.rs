//! The command abstraction shared by every resxkit subcommand.

use std::{fmt, io::Write};

use crate::{
    error::CliError,
    parameter::{Parameter, ParameterError, Parameters, Value},
    registry::switch_name,
};

/// The reported result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(String),
}

/// A named operation with a fixed parameter set.
///
/// The registry keeps one prototype of every command; each invocation works on
/// a fresh copy from [`Command::create`], which collects parameter values, is
/// validated, and is executed once.
pub trait Command {
    /// Name used to select the command on the command line.
    fn name(&self) -> &'static str;

    /// Usage text, one line per row of the help screen.
    fn usage(&self) -> &'static str;

    /// Example invocations; `{program}` is replaced with the binary name.
    fn examples(&self) -> &'static str {
        ""
    }

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    /// A fresh, unparsed instance of this command.
    fn create(&self) -> Box<dyn Command>;

    /// Domain check applied after `value` parsed as the parameter's kind.
    fn accepts(&self, _parameter: &Parameter, _value: &Value) -> bool {
        true
    }

    /// Runs the command, writing its report to `out`.
    fn execute(&mut self, out: &mut dyn Write) -> Result<Outcome, CliError>;

    /// Assigns the raw text following `switch` to the parameter it names.
    fn set_parameter_value(&mut self, switch: &str, raw: Option<&str>) -> Result<(), CliError> {
        let name = switch_name(switch).unwrap_or(switch);
        let invalid = || CliError::InvalidParameterValue {
            switch: switch.to_string(),
            value: raw.unwrap_or_default().to_string(),
        };

        let parameter = self
            .parameters()
            .find(name)
            .ok_or_else(|| CliError::UnknownParameter(switch.to_string()))?;
        let value = parameter.parse_value(raw).map_err(|e| match e {
            ParameterError::AlreadySet => CliError::DuplicateParameter(switch.to_string()),
            ParameterError::InvalidValue(_) => invalid(),
        })?;
        if !self.accepts(parameter, &value) {
            return Err(invalid());
        }

        self.parameters_mut()
            .find_mut(name)
            .ok_or_else(|| CliError::UnknownParameter(switch.to_string()))?
            .assign(value)
            .map_err(|_| CliError::DuplicateParameter(switch.to_string()))
    }

    /// Checks that every required parameter has a non-blank value.
    fn validate(&self) -> Result<(), CliError> {
        match self
            .parameters()
            .iter()
            .find(|p| p.is_required() && !p.is_satisfied())
        {
            Some(missing) => Err(CliError::MissingRequiredParameter {
                command: self.name(),
                parameter: missing.name(),
            }),
            None => Ok(()),
        }
    }

    /// The value of a required string parameter, once validated.
    fn required_str(&self, name: &'static str) -> Result<&str, CliError> {
        self.parameters()
            .str_value(name)
            .ok_or(CliError::MissingRequiredParameter {
                command: self.name(),
                parameter: name,
            })
    }
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("parameters", self.parameters())
            .finish()
    }
}

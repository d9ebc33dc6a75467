//! Command discovery, argument parsing and the run loop.
//!
//! Grammar: `[-Debug] <Command> [-Parameter [value]]...`. Switches start with
//! `-` or `/` and match case-insensitively. A switch followed directly by
//! another switch, or by nothing, gets an empty value.

use std::{io::Write, time::Instant};

use tracing::{debug, info};

use crate::{
    command::{Command, Outcome},
    commands::{ExportResxCommand, GenerateResxCommand, ImportResxCommand},
    error::CliError,
    usage::render_usage,
};

const DEBUG_SWITCH: &str = "Debug";
const HELP_SWITCHES: [&str; 3] = ["Help", "H", "?"];
const RULE: &str = "------------------------------------------------------------";

/// The name part of a switch token, or `None` if `token` is not a switch.
///
/// Switches start with `-` or `/`. Whether a `/` token following a switch is
/// a switch or a value depends on the command, see [`Registry::parse`].
pub fn switch_name(token: &str) -> Option<&str> {
    let token = token.trim();
    if let Some(name) = token.strip_prefix('-') {
        return Some(name);
    }
    token.strip_prefix('/').filter(|name| !name.is_empty())
}

pub fn is_switch(token: &str) -> bool {
    switch_name(token).is_some()
}

pub fn is_help_switch(token: &str) -> bool {
    switch_name(token)
        .is_some_and(|name| HELP_SWITCHES.iter().any(|h| h.eq_ignore_ascii_case(name)))
}

/// Whether `token`, read where a value of `command` may appear, starts the next switch.
///
/// `-` tokens always do. A `/` token only does when it names a parameter of
/// `command` or a global switch; otherwise it is a value such as `/tmp`.
fn ends_value(command: &dyn Command, token: &str) -> bool {
    match switch_name(token) {
        None => false,
        Some(_) if token.trim_start().starts_with('-') => true,
        Some(name) => {
            command.parameters().find(name).is_some()
                || name.eq_ignore_ascii_case(DEBUG_SWITCH)
                || HELP_SWITCHES.iter().any(|h| h.eq_ignore_ascii_case(name))
        }
    }
}

/// Strips a leading `-Debug` switch, reporting whether it was present.
pub fn prepare_arguments(mut args: Vec<String>) -> (Vec<String>, bool) {
    let debug = args
        .first()
        .and_then(|first| switch_name(first))
        .is_some_and(|name| name.eq_ignore_ascii_case(DEBUG_SWITCH));
    if debug {
        args.remove(0);
    }
    (args, debug)
}

/// The set of commands known to the binary.
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
}

impl Registry {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        debug_assert!(
            commands.iter().enumerate().all(|(i, a)| commands[i + 1..]
                .iter()
                .all(|b| !a.name().eq_ignore_ascii_case(b.name()))),
            "command names must be unique"
        );
        Registry { commands }
    }

    /// Every command resxkit ships with.
    pub fn builtin() -> Self {
        Self::new(vec![
            Box::new(ExportResxCommand::new()),
            Box::new(GenerateResxCommand::new()),
            Box::new(ImportResxCommand::new()),
        ])
    }

    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    /// A fresh instance of the command called `name` (case-insensitive).
    pub fn create(&self, name: &str) -> Result<Box<dyn Command>, CliError> {
        let name = name.trim();
        self.commands
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .map(|c| c.create())
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))
    }

    /// Turns the argument list into a command with its parameters assigned.
    ///
    /// Nothing is executed here; any error aborts the whole invocation. A `/`
    /// token right after a switch is taken as that switch's value unless it
    /// names a parameter of the selected command, so `-Source /tmp` works.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Box<dyn Command>, CliError> {
        let mut tokens = args.iter().map(AsRef::as_ref).peekable();
        let mut selected: Option<Box<dyn Command>> = None;

        while let Some(token) = tokens.next() {
            if is_switch(token) {
                let command = selected
                    .as_mut()
                    .ok_or_else(|| CliError::Syntax(token.to_string()))?;
                let value = tokens.next_if(|next| !ends_value(&**command, next));
                debug!(switch = token, value, "assigning parameter");
                command.set_parameter_value(token, value)?;
            } else if selected.is_some() {
                return Err(CliError::MultipleCommands);
            } else {
                selected = Some(self.create(token)?);
            }
        }

        selected.ok_or(CliError::CommandRequired)
    }
}

/// Runs one invocation: usage, or parse, validate and execute.
pub fn run<S: AsRef<str>>(
    registry: &Registry,
    args: &[S],
    program: &str,
    version: &str,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    if args.first().is_none_or(|first| is_help_switch(first.as_ref())) {
        writeln!(out)?;
        writeln!(out, "{}", render_usage(registry, program, version))?;
        return Ok(Outcome::Succeeded);
    }

    let mut command = registry.parse(args)?;
    command.validate()?;
    execute(command.as_mut(), out)
}

fn execute(command: &mut dyn Command, out: &mut dyn Write) -> Result<Outcome, CliError> {
    writeln!(out)?;
    writeln!(out, "Processing command {}...", command.name())?;
    writeln!(out, "{RULE}")?;

    info!(command = command.name(), "executing");
    let started = Instant::now();
    let outcome = command.execute(out)?;
    writeln!(out, "Duration: {} seconds", started.elapsed().as_millis() as f64 / 1000.0)?;

    writeln!(out, "{RULE}")?;
    match &outcome {
        Outcome::Succeeded => writeln!(out, "Processing command {}... Succeeded.", command.name())?,
        Outcome::Failed(reason) => writeln!(
            out,
            "Processing command {}... Failed: {}",
            command.name(),
            reason
        )?,
    }
    Ok(outcome)
}

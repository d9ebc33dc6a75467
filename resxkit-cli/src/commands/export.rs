use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use resxkit::{classify::is_invariant_file, tree};
use tracing::{debug, info};

use super::is_existing_directory;
use crate::{
    command::{Command, Outcome},
    error::CliError,
    parameter::{Parameter, Parameters, Value},
};

const SOURCE: &str = "Source";
const TARGET: &str = "Target";
const CLEAN: &str = "Clean";

/// Copies the invariant `.resx` files of a source tree into a target tree,
/// keeping their relative locations.
pub struct ExportResxCommand {
    parameters: Parameters,
}

impl ExportResxCommand {
    pub fn new() -> Self {
        ExportResxCommand {
            parameters: Parameters::new()
                .with(Parameter::string(SOURCE, "S", true))
                .with(Parameter::string(TARGET, "T", true))
                .with(Parameter::bool(CLEAN, "C", false)),
        }
    }
}

impl Default for ExportResxCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// `path` with links and `..` resolved as far as it exists on disk.
///
/// The missing tail, such as a target directory not created yet, is appended
/// to the canonical form of its closest existing ancestor.
fn canonical(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(existing) {
            return missing
                .iter()
                .rev()
                .fold(resolved, |resolved, name| resolved.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

/// Why exporting `source` into `target` cannot work, if it cannot.
///
/// A target inside the source would be walked while it is being filled, and
/// cleaning a target that contains the source would delete the input.
fn overlap_problem(source: &Path, target: &Path, clean: bool) -> Option<String> {
    let source = canonical(source);
    let target = canonical(target);
    if target.starts_with(&source) {
        Some(format!(
            "target directory {} is inside source directory {}",
            target.display(),
            source.display()
        ))
    } else if clean && source.starts_with(&target) {
        Some(format!(
            "cleaning target directory {} would delete source directory {}",
            target.display(),
            source.display()
        ))
    } else {
        None
    }
}

impl Command for ExportResxCommand {
    fn name(&self) -> &'static str {
        "ExportResx"
    }

    fn usage(&self) -> &'static str {
        "Copies invariant .resx files from -Source into -Target, mirroring the tree.\n\
         -Source (-S) <dir>    tree to export from (must exist)\n\
         -Target (-T) <dir>    tree to export into\n\
         -Clean (-C) <bool>    empty -Target first (default true)"
    }

    fn examples(&self) -> &'static str {
        "{program} ExportResx -Source src/App -Target loc/en"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn create(&self) -> Box<dyn Command> {
        Box::new(ExportResxCommand::new())
    }

    fn accepts(&self, parameter: &Parameter, value: &Value) -> bool {
        parameter.name() != SOURCE || is_existing_directory(value)
    }

    fn execute(&mut self, out: &mut dyn Write) -> Result<Outcome, CliError> {
        let source = PathBuf::from(self.required_str(SOURCE)?);
        let target = PathBuf::from(self.required_str(TARGET)?);
        let clean = self.parameters.bool_value(CLEAN).unwrap_or(true);

        if !source.is_dir() {
            return Ok(Outcome::Failed(format!(
                "source directory {} does not exist",
                source.display()
            )));
        }
        if let Some(problem) = overlap_problem(&source, &target, clean) {
            return Ok(Outcome::Failed(problem));
        }

        if clean && target.is_dir() {
            info!("clearing {}", target.display());
            tree::clear_directory(&target)?;
        }

        let exported = tree::mirror(
            &source,
            &target,
            &is_invariant_file,
            &mut |from: &Path, to: &Path| -> Result<(), resxkit::Error> {
                debug!("exporting {} to {}", from.display(), to.display());
                fs::copy(from, to)?;
                Ok(())
            },
        )?;

        writeln!(out, "Files exported: {exported}")?;
        Ok(Outcome::Succeeded)
    }
}

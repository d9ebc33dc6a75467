use std::{
    io::Write,
    path::{Path, PathBuf},
};

use resxkit::{Parser, ResxFormat, classify::is_culture_file, tree};
use tracing::{debug, warn};

use super::is_existing_directory;
use crate::{
    command::{Command, Outcome},
    error::CliError,
    parameter::{Parameter, Parameters, Value},
};

const SOURCE: &str = "Source";
const TARGET: &str = "Target";

/// Brings translated culture files back into a build tree.
///
/// Each culture file is decoded and re-encoded, so the written file is
/// normalised to the standard layout while every entry stays unchanged.
pub struct ImportResxCommand {
    parameters: Parameters,
}

impl ImportResxCommand {
    pub fn new() -> Self {
        ImportResxCommand {
            parameters: Parameters::new()
                .with(Parameter::string(SOURCE, "S", true))
                .with(Parameter::string(TARGET, "T", true)),
        }
    }
}

impl Default for ImportResxCommand {
    fn default() -> Self {
        Self::new()
    }
}

fn import_file(from: &Path, to: &Path) -> Result<(), resxkit::Error> {
    debug!("importing {} to {}", from.display(), to.display());
    let format = ResxFormat::read_from(from)?;

    let resx_dir = from.parent().unwrap_or(Path::new("."));
    for entry in &format.entries {
        if let Some(file_ref) = &entry.file_ref {
            let resolved = format.resolve_file_ref(file_ref, resx_dir);
            if !resolved.exists() {
                warn!(
                    "{}: `{}` references missing file {}",
                    from.display(),
                    entry.key,
                    resolved.display()
                );
            }
        }
    }

    format.write_to(to)
}

impl Command for ImportResxCommand {
    fn name(&self) -> &'static str {
        "ImportResx"
    }

    fn usage(&self) -> &'static str {
        "Copies culture .resx files from -Source into -Target, mirroring the tree.\n\
         -Source (-S) <dir>    tree holding translated files (must exist)\n\
         -Target (-T) <dir>    build tree to import into"
    }

    fn examples(&self) -> &'static str {
        "{program} ImportResx -Source loc/translated -Target src/App"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn create(&self) -> Box<dyn Command> {
        Box::new(ImportResxCommand::new())
    }

    fn accepts(&self, parameter: &Parameter, value: &Value) -> bool {
        parameter.name() != SOURCE || is_existing_directory(value)
    }

    fn execute(&mut self, out: &mut dyn Write) -> Result<Outcome, CliError> {
        let source = PathBuf::from(self.required_str(SOURCE)?);
        let target = PathBuf::from(self.required_str(TARGET)?);

        if !source.is_dir() {
            return Ok(Outcome::Failed(format!(
                "source directory {} does not exist",
                source.display()
            )));
        }

        let imported = tree::mirror(&source, &target, &is_culture_file, &mut import_file)?;

        writeln!(out, "Files imported: {imported}")?;
        Ok(Outcome::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resxkit::Entry;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_imports_culture_files_with_entries_unchanged() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("translated");
        let target = dir.path().join("build");
        fs::create_dir_all(source.join("Forms")).unwrap();

        let translated = ResxFormat::new(vec![
            Entry::text("Title", "Bonjour  le monde\n").with_comment("greeting"),
            Entry::text("Empty", ""),
        ]);
        translated
            .write_to(source.join("Forms").join("Main.fr.resx"))
            .unwrap();
        ResxFormat::new(vec![Entry::text("Title", "Hello")])
            .write_to(source.join("Forms").join("Main.resx"))
            .unwrap();

        let mut command = ImportResxCommand::new();
        command.set_parameter_value("/S", source.to_str()).unwrap();
        command.set_parameter_value("/T", target.to_str()).unwrap();
        command.validate().unwrap();

        let mut out = Vec::new();
        assert_eq!(command.execute(&mut out).unwrap(), Outcome::Succeeded);
        assert_eq!(String::from_utf8(out).unwrap(), "Files imported: 1\n");

        assert!(!target.join("Forms").join("Main.resx").exists());
        let imported = ResxFormat::read_from(target.join("Forms").join("Main.fr.resx")).unwrap();
        assert_eq!(imported.entries, translated.entries);
    }

    #[test]
    fn test_codec_errors_abort_the_import() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("translated");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("Broken.de.resx"), "<root><data><value>x</value></data></root>").unwrap();

        let mut command = ImportResxCommand::new();
        command.set_parameter_value("-Source", source.to_str()).unwrap();
        command
            .set_parameter_value("-Target", dir.path().join("build").to_str())
            .unwrap();

        let err = command.execute(&mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Resource(_)));
    }
}

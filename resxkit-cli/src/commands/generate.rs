use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use resxkit::{
    Entry, Parser, ResxFormat,
    classify::culture_file_path,
    pseudo::{is_pseudo_culture, pseudo_translate},
    tree,
};
use serde::Serialize;
use tracing::{debug, error, info};
use unic_langid::LanguageIdentifier;

use super::is_existing_directory;
use crate::{
    command::{Command, Outcome},
    error::CliError,
    parameter::{Parameter, Parameters, Value},
};

const PATH: &str = "Path";
const CULTURE_CODE: &str = "CultureCode";
const REPORT: &str = "Report";

/// Keys with this prefix hold designer metadata, not UI text.
const RESERVED_KEY_PREFIX: &str = ">>";
const DO_NOT_TRANSLATE: &str = "do not translate";

/// Counters and file lists collected by one GenerateResx run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    pub culture: String,
    pub pseudo: bool,
    pub invariant_files: usize,
    pub resources_found: usize,
    pub words_found: usize,
    pub empty_files: Vec<PathBuf>,
    pub failed_files: Vec<PathBuf>,
    pub files_generated: usize,
    pub resources_generated: usize,
}

/// Whether an entry of an invariant file needs a translation.
pub fn is_translatable(entry: &Entry) -> bool {
    !entry.key.starts_with(RESERVED_KEY_PREFIX)
        && !entry.key.trim().is_empty()
        && entry.file_ref.is_none()
        && entry.is_text_string()
        && !entry.comment.to_lowercase().contains(DO_NOT_TRANSLATE)
}

/// What happened to one invariant file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileResult {
    Empty,
    Generated { resources: usize, words: usize },
}

fn generate_file(invariant: &Path, culture: &str, pseudo: bool) -> Result<FileResult, resxkit::Error> {
    let format = ResxFormat::read_from(invariant)?;

    let mut kept = BTreeMap::new();
    for entry in format.entries.into_iter().filter(is_translatable) {
        if kept.contains_key(&entry.key) {
            return Err(resxkit::Error::DuplicateKey(entry.key));
        }
        kept.insert(entry.key, entry.value.unwrap_or_default());
    }
    if kept.is_empty() {
        return Ok(FileResult::Empty);
    }

    let words = kept.values().map(|v| v.split_whitespace().count()).sum();
    let resources = kept.len();
    let entries = kept
        .into_iter()
        .map(|(key, value)| {
            let value = if pseudo {
                pseudo_translate(&value)
            } else {
                String::new()
            };
            Entry::text(key, value)
        })
        .collect();

    let output = culture_file_path(invariant, culture).ok_or_else(|| {
        resxkit::Error::invalid_resource(format!(
            "cannot name a `{culture}` file after {}: not an invariant .resx file",
            invariant.display()
        ))
    })?;
    debug!("generating {}", output.display());
    ResxFormat::new(entries).write_to(&output)?;

    Ok(FileResult::Generated { resources, words })
}

/// Writes a `<name>.<culture>.resx` file next to every invariant file of a
/// tree, with empty values or, for the pseudo culture, pseudo-translated ones.
pub struct GenerateResxCommand {
    parameters: Parameters,
    summary: GenerateSummary,
}

impl GenerateResxCommand {
    pub fn new() -> Self {
        GenerateResxCommand {
            parameters: Parameters::new()
                .with(Parameter::string(PATH, "P", true))
                .with(Parameter::string(CULTURE_CODE, "CC", true))
                .with(Parameter::string(REPORT, "R", false)),
            summary: GenerateSummary::default(),
        }
    }

    pub fn summary(&self) -> &GenerateSummary {
        &self.summary
    }

    fn print_summary(&self, out: &mut dyn Write) -> Result<(), CliError> {
        let summary = &self.summary;
        if !summary.empty_files.is_empty() {
            writeln!(out, "Empty invariant files:")?;
            for path in &summary.empty_files {
                writeln!(out, "  {}", path.display())?;
            }
        }
        writeln!(out, "Invariant files found: {}", summary.invariant_files)?;
        writeln!(out, "Resources found: {}", summary.resources_found)?;
        writeln!(out, "Words found: {}", summary.words_found)?;
        writeln!(out, "Empty files: {}", summary.empty_files.len())?;
        if !summary.failed_files.is_empty() {
            writeln!(out, "Failed files: {}", summary.failed_files.len())?;
        }
        writeln!(out, "Files generated: {}", summary.files_generated)?;
        writeln!(out, "Resources generated: {}", summary.resources_generated)?;
        Ok(())
    }
}

impl Default for GenerateResxCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for GenerateResxCommand {
    fn name(&self) -> &'static str {
        "GenerateResx"
    }

    fn usage(&self) -> &'static str {
        "Writes a culture file beside every invariant .resx file under -Path.\n\
         -Path (-P) <dir>           tree to generate in (must exist)\n\
         -CultureCode (-CC) <code>  culture of the generated files; `ja` pseudo-translates\n\
         -Report (-R) <file>        also write a JSON summary to <file>"
    }

    fn examples(&self) -> &'static str {
        "{program} GenerateResx -Path loc/en -CultureCode fr\n\
         {program} -Debug GenerateResx /P loc/en /CC ja /R pseudo.json"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn create(&self) -> Box<dyn Command> {
        Box::new(GenerateResxCommand::new())
    }

    fn accepts(&self, parameter: &Parameter, value: &Value) -> bool {
        match (parameter.name(), value) {
            (PATH, value) => is_existing_directory(value),
            (CULTURE_CODE, Value::String(Some(code))) => code.parse::<LanguageIdentifier>().is_ok(),
            _ => true,
        }
    }

    fn execute(&mut self, out: &mut dyn Write) -> Result<Outcome, CliError> {
        let root = PathBuf::from(self.required_str(PATH)?);
        let culture = self.required_str(CULTURE_CODE)?.to_lowercase();
        let report = self.parameters.str_value(REPORT).map(PathBuf::from);

        if !root.is_dir() {
            return Ok(Outcome::Failed(format!(
                "directory {} does not exist",
                root.display()
            )));
        }

        let pseudo = is_pseudo_culture(&culture);
        let invariant_files = tree::list_invariant_files(&root)?;
        info!(
            "generating `{culture}` files for {} invariant files",
            invariant_files.len()
        );

        self.summary = GenerateSummary {
            culture: culture.clone(),
            pseudo,
            invariant_files: invariant_files.len(),
            ..Default::default()
        };

        for invariant in invariant_files {
            match generate_file(&invariant, &culture, pseudo) {
                Ok(FileResult::Empty) => self.summary.empty_files.push(invariant),
                Ok(FileResult::Generated { resources, words }) => {
                    self.summary.resources_found += resources;
                    self.summary.words_found += words;
                    self.summary.files_generated += 1;
                    self.summary.resources_generated += resources;
                }
                Err(e) => {
                    error!("failed to process {}: {e}", invariant.display());
                    writeln!(out, "Failed to process {}: {e}", invariant.display())?;
                    self.summary.failed_files.push(invariant);
                }
            }
        }

        self.print_summary(out)?;

        if let Some(report) = report {
            debug!("writing report to {}", report.display());
            fs::write(&report, serde_json::to_string_pretty(&self.summary)?)?;
        }

        Ok(Outcome::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_invariant(path: &Path, entries: Vec<Entry>) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        ResxFormat::new(entries).write_to(path).unwrap();
    }

    fn command(root: &Path, culture: &str) -> GenerateResxCommand {
        let mut command = GenerateResxCommand::new();
        command.set_parameter_value("-Path", root.to_str()).unwrap();
        command.set_parameter_value("-CC", Some(culture)).unwrap();
        command.validate().unwrap();
        command
    }

    #[test]
    fn test_translatable_filter() {
        assert!(is_translatable(&Entry::text("Title", "Hello")));
        assert!(!is_translatable(&Entry::text(">>Title.Name", "Title")));
        assert!(!is_translatable(&Entry::text("  ", "blank key")));
        assert!(!is_translatable(
            &Entry::text("Build", "1.0").with_comment("Do NOT translate: version")
        ));

        let mut sized = Entry::text("Button.Size", "75, 23");
        sized.type_name = Some("System.Drawing.Size, System.Drawing".to_string());
        assert!(!is_translatable(&sized));

        let mut blob = Entry::text("Icon", "AAAB");
        blob.mime_type = Some("application/x-microsoft.net.object.bytearray.base64".to_string());
        assert!(!is_translatable(&blob));
    }

    #[test]
    fn test_culture_code_is_checked_and_lowercased() {
        let dir = TempDir::new().unwrap();
        let mut bad = GenerateResxCommand::new();
        let err = bad
            .set_parameter_value("-CultureCode", Some("not a culture"))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidParameterValue { .. }));

        write_invariant(&dir.path().join("Strings.resx"), vec![Entry::text("A", "a")]);
        let mut generate = command(dir.path(), "pt-BR");
        generate.execute(&mut Vec::new()).unwrap();
        assert!(dir.path().join("Strings.pt-br.resx").is_file());
        assert_eq!(generate.summary().culture, "pt-br");
    }

    #[test]
    fn test_generates_sorted_empty_values() {
        let dir = TempDir::new().unwrap();
        let invariant = dir.path().join("Forms").join("Main.resx");
        write_invariant(
            &invariant,
            vec![
                Entry::text("Title", "Main window"),
                Entry::text(">>Title.Name", "Title"),
                Entry::text("Accept", "OK"),
            ],
        );

        let mut generate = command(dir.path(), "fr");
        let mut out = Vec::new();
        assert_eq!(generate.execute(&mut out).unwrap(), Outcome::Succeeded);

        let written = ResxFormat::read_from(dir.path().join("Forms").join("Main.fr.resx")).unwrap();
        assert_eq!(
            written.entries,
            vec![Entry::text("Accept", ""), Entry::text("Title", "")]
        );

        let summary = generate.summary();
        assert!(!summary.pseudo);
        assert_eq!(summary.invariant_files, 1);
        assert_eq!(summary.resources_found, 2);
        assert_eq!(summary.words_found, 3);
        assert_eq!(summary.files_generated, 1);
        assert_eq!(summary.resources_generated, 2);
        assert!(String::from_utf8(out).unwrap().contains("Words found: 3\n"));
    }

    #[test]
    fn test_pseudo_culture_translates_values() {
        let dir = TempDir::new().unwrap();
        write_invariant(
            &dir.path().join("Strings.resx"),
            vec![Entry::text("Greeting", "Hello World")],
        );

        command(dir.path(), "JA").execute(&mut Vec::new()).unwrap();

        let written = ResxFormat::read_from(dir.path().join("Strings.ja.resx")).unwrap();
        assert_eq!(
            written.entries[0].value.as_deref(),
            Some("[ !!! Ħęľľő Ŵőřľđ !!! !!!]")
        );
    }

    #[test]
    fn test_empty_and_broken_files_are_reported() {
        let dir = TempDir::new().unwrap();
        write_invariant(
            &dir.path().join("A.resx"),
            vec![Entry::text("Version", "1.0").with_comment("do not translate")],
        );
        fs::write(dir.path().join("B.resx"), "<root><data name=\"x\">").unwrap();
        write_invariant(&dir.path().join("C.resx"), vec![Entry::text("Ok", "Fine")]);
        let report = dir.path().join("report.json");

        let mut generate = command(dir.path(), "de");
        generate
            .set_parameter_value("-Report", report.to_str())
            .unwrap();
        let mut out = Vec::new();
        assert_eq!(generate.execute(&mut out).unwrap(), Outcome::Succeeded);

        assert!(!dir.path().join("A.de.resx").exists());
        assert!(!dir.path().join("B.de.resx").exists());
        assert!(dir.path().join("C.de.resx").is_file());

        let summary = generate.summary();
        assert_eq!(summary.empty_files, vec![dir.path().join("A.resx")]);
        assert_eq!(summary.failed_files, vec![dir.path().join("B.resx")]);
        assert_eq!(summary.files_generated, 1);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to process"));
        assert!(text.contains("Empty files: 1\n"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(json["culture"], "de");
        assert_eq!(json["files_generated"], 1);
        assert_eq!(json["failed_files"].as_array().unwrap().len(), 1);
    }
}

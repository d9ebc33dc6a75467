//! Help screen rendering.

use std::fmt::Write;

use crate::registry::Registry;

const NAME_WIDTH: usize = 20;

/// Renders the help screen listing every registered command.
pub fn render_usage(registry: &Registry, program: &str, version: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{program} {version}");
    let _ = writeln!(text);
    let _ = writeln!(
        text,
        "Usage: {program} [-Debug] <Command> [-Parameter [value]]..."
    );
    let _ = writeln!(text);
    let _ = writeln!(text, "Commands:");

    for command in registry.commands() {
        let mut lines = command.usage().lines();
        let first = lines.next().unwrap_or_default();
        let _ = writeln!(text, "  {:<NAME_WIDTH$}{first}", command.name());
        for line in lines {
            let _ = writeln!(text, "  {:<NAME_WIDTH$}{line}", "");
        }
    }

    let examples: Vec<&str> = registry
        .commands()
        .map(|c| c.examples())
        .filter(|e| !e.is_empty())
        .collect();
    if !examples.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(text, "Examples:");
        for line in examples.iter().flat_map(|e| e.lines()) {
            let _ = writeln!(text, "  {}", line.replace("{program}", program));
        }
    }

    text
}

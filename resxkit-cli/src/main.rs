use std::{
    io::{self, Write},
    process::ExitCode,
};

use resxkit_cli::{Outcome, Registry, prepare_arguments, run};
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs go to stderr so stdout only carries the command report.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let (args, debug) = prepare_arguments(std::env::args().skip(1).collect());
    init_tracing(debug);

    let registry = Registry::builtin();
    let mut stdout = io::stdout().lock();
    match run(&registry, &args, PROGRAM, VERSION, &mut stdout) {
        Ok(Outcome::Succeeded) => ExitCode::SUCCESS,
        Ok(Outcome::Failed(_)) => ExitCode::FAILURE,
        Err(e) => {
            let _ = writeln!(stdout);
            let _ = writeln!(stdout, "An error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}

//! Command dispatch and handlers.

pub mod check_config;
pub mod due;
pub mod run;

use crate::cli::{Cli, Command};
use crate::logging::LogCapture;

/// Dispatch a parsed command to its handler.
///
/// `log` receives a copy of every log line; `run` appends it to the report.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli, log: &LogCapture) -> Result<(), String> {
    match &cli.command {
        Command::Run { dry_run, date } => run::run(&cli.global, *dry_run, *date, log),
        Command::CheckConfig => check_config::run(&cli.global),
        Command::Due { date } => due::run(&cli.global, *date),
    }
}

/// Builds the single-threaded runtime used for tracker and SMTP calls.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}

//! Core library entry for the `issuegen` CLI.
//!
//! Reads declarative issue definitions, decides which are due today, creates
//! them in YouTrack and mails a summary report of the run.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod definition;
pub mod issue;
pub mod ledger;
pub mod logging;
pub mod ports;
pub mod report;
pub mod run;
pub mod schedule;
pub mod store;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// A `.env` file in the working directory is loaded first so it can supply
/// both flag defaults and configuration overrides.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    dotenvy::dotenv().ok();
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let log = logging::init(cli.global.debug);
    commands::dispatch(&cli, &log)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["issuegen", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_config() {
        let result = run(["issuegen", "run", "--config", "/nonexistent/issuegen.toml"]);
        assert!(result.unwrap_err().contains("/nonexistent/issuegen.toml"));
    }
}

//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `issuegen`.
#[derive(Debug, Parser)]
#[command(name = "issuegen", version, about = "Create scheduled recurring issues in YouTrack")]
pub struct Cli {
    /// Global options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted before or after any subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "ISSUEGEN_CONFIG", default_value = "issuegen.toml")]
    pub config: PathBuf,
    /// Directory holding the issue definition YAML files.
    #[arg(long, global = true, env = "ISSUEGEN_ISSUES", default_value = "issues")]
    pub issues: PathBuf,
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create every issue due today and send the report.
    Run {
        /// Resolve projects and fields but create nothing; print the report.
        #[arg(long)]
        dry_run: bool,
        /// Evaluate as of this date (DD-MM-YYYY) instead of today.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Validate the configuration and definitions against the tracker.
    CheckConfig,
    /// List the definitions due on a date without contacting the tracker.
    Due {
        /// Date to evaluate (DD-MM-YYYY); defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%d-%m-%Y")
        .map_err(|e| format!("expected a date as DD-MM-YYYY: {e}"))
}

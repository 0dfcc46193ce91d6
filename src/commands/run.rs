//! `issuegen run` command.

use chrono::NaiveDate;
use tracing::error;

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::context::{LiveOptions, ServiceContext};
use crate::logging::LogCapture;
use crate::run::RunCoordinator;
use crate::store::DefinitionStore;

/// Execute the `run` command.
///
/// Configuration problems stop the command before anything is contacted.
/// Once the run starts, the report is always rendered and delivered.
///
/// # Errors
///
/// Returns an error string if configuration fails, the run aborted, or the
/// report could not be delivered.
pub fn run(
    global: &GlobalArgs,
    dry_run: bool,
    date: Option<NaiveDate>,
    log: &LogCapture,
) -> Result<(), String> {
    let config = Config::load(&global.config).map_err(|e| {
        error!(error = %e, "Unable to load configuration");
        e.to_string()
    })?;
    let ctx = ServiceContext::live(&config, LiveOptions { date, dry_run })?;
    let store = DefinitionStore::new(ctx.fs.as_ref(), &global.issues);

    let report = super::runtime()?.block_on(async {
        let mut coordinator = RunCoordinator::new(&ctx);
        coordinator.run(&store, log).await
    });

    if let Some(reason) = &report.abort_reason {
        return Err(format!("Run aborted: {reason}"));
    }
    if !report.delivered {
        return Err(format!("Report was not delivered via {}", ctx.mailer.channel_name()));
    }
    Ok(())
}

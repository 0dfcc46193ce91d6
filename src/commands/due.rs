//! `issuegen due` command.

use chrono::NaiveDate;

use crate::adapters::live::{LiveClock, LiveFileSystem};
use crate::cli::GlobalArgs;
use crate::definition::IssueDefinition;
use crate::ports::Clock;
use crate::store::DefinitionStore;

/// Execute the `due` command.
///
/// Lists the definitions that would be created on `date` (today when
/// absent). Reads only the definition store; the tracker is not contacted.
///
/// # Errors
///
/// Returns an error string if the definitions cannot be loaded.
pub fn run(global: &GlobalArgs, date: Option<NaiveDate>) -> Result<(), String> {
    let date = date.unwrap_or_else(|| LiveClock.today());
    let fs = LiveFileSystem;
    let definitions = DefinitionStore::new(&fs, &global.issues).load_all().map_err(|e| e.to_string())?;

    let due = due_on(&definitions, date);
    if due.is_empty() {
        println!("No issues due on {}.", date.format("%d-%m-%Y"));
        return Ok(());
    }
    for definition in &due {
        println!("{}", definition.label());
    }
    println!("\n{} of {} issue(s) due on {}.", due.len(), definitions.len(), date.format("%d-%m-%Y"));
    Ok(())
}

fn due_on(definitions: &[IssueDefinition], date: NaiveDate) -> Vec<&IssueDefinition> {
    definitions.iter().filter(|d| d.is_due(date)).collect()
}

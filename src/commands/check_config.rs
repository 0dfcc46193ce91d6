//! `issuegen check-config` command.

use std::collections::BTreeSet;

use crate::adapters::live::{LiveFileSystem, LiveTracker};
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::definition::IssueDefinition;
use crate::issue::ProjectDirectory;
use crate::store::DefinitionStore;

/// Execute the `check-config` command.
///
/// Loads the configuration and every definition, then fetches the project
/// directory and reports definitions that name unknown projects or carry a
/// rejected date rule.
///
/// # Errors
///
/// Returns an error string describing the first fatal problem, or a count
/// of the definition problems found.
pub fn run(global: &GlobalArgs) -> Result<(), String> {
    let config = Config::load(&global.config).map_err(|e| e.to_string())?;
    println!("Configuration: OK ({})", global.config.display());

    let fs = LiveFileSystem;
    let definitions =
        DefinitionStore::new(&fs, &global.issues).load_all().map_err(|e| e.to_string())?;
    println!("Definitions: {} loaded from {}", definitions.len(), global.issues.display());

    let tracker = LiveTracker::new(&config.tracker).map_err(|e| e.to_string())?;
    let directory = super::runtime()?
        .block_on(ProjectDirectory::fetch(&tracker))
        .map_err(|e| format!("Tracker: {e}"))?;
    println!("Tracker: OK ({} projects)", directory.len());

    let problems = problems(&definitions, &directory);
    if problems.is_empty() {
        println!("No problems found.");
        return Ok(());
    }
    for problem in &problems {
        println!("  {problem}");
    }
    Err(format!("{} problem(s) found", problems.len()))
}

fn problems(definitions: &[IssueDefinition], directory: &ProjectDirectory) -> Vec<String> {
    let mut found = Vec::new();
    let mut unknown = BTreeSet::new();
    for definition in definitions {
        if let Err(reason) = &definition.rule {
            found.push(format!("{}: {reason}", definition.label()));
        }
        if directory.resolve(&definition.project).is_none() {
            unknown.insert(definition.project.as_str());
        }
    }
    found.extend(unknown.into_iter().map(|p| format!("unknown project: {p:?}")));
    found
}

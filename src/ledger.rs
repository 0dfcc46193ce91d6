//! Per-issue outcomes of a run and the rendered summary.

use std::fmt::Write;

use thiserror::Error;

use crate::definition::IssueDefinition;

/// Why a due definition did not produce an issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// The definition names a project the tracker does not know.
    #[error("project not found")]
    ProjectNotFound,
    /// The tracker answered the creation request with a non-success status.
    #[error("creation rejected (HTTP {status})")]
    CreationRejected {
        /// HTTP status code returned by the tracker.
        status: u16,
    },
    /// The creation request never got an answer.
    #[error("creation failed: {0}")]
    CreationFailed(String),
}

/// Classification of one definition for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An issue was created.
    Created,
    /// The definition was not due today.
    Skipped,
    /// The definition was due but no issue was created.
    Error(IssueError),
}

/// One outcome with the definition it belongs to.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    /// Target project short name.
    pub project: String,
    /// Issue summary.
    pub summary: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Outcome tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Issues created.
    pub created: usize,
    /// Definitions not due.
    pub skipped: usize,
    /// Definitions that failed.
    pub errors: usize,
}

/// Accumulates outcomes in definition order.
#[derive(Debug, Clone, Default)]
pub struct ResultLedger {
    entries: Vec<LedgerEntry>,
}

impl ResultLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `definition`.
    pub fn record(&mut self, definition: &IssueDefinition, outcome: Outcome) {
        self.entries.push(LedgerEntry {
            project: definition.project.clone(),
            summary: definition.summary.clone(),
            outcome,
        });
    }

    /// Entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Outcomes in the order they were recorded.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().map(|e| &e.outcome)
    }

    /// Tallies outcomes by kind.
    #[must_use]
    pub fn counts(&self) -> Counts {
        self.outcomes().fold(Counts::default(), |mut c, outcome| {
            match outcome {
                Outcome::Created => c.created += 1,
                Outcome::Skipped => c.skipped += 1,
                Outcome::Error(_) => c.errors += 1,
            }
            c
        })
    }

    /// Renders the summary: counts, then CREATED, SKIPPED and ERROR lines.
    #[must_use]
    pub fn render_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No issues have been detected.\n".to_string();
        }

        let counts = self.counts();
        let mut out = format!(
            "Created: {}, Skipped: {}, Errors: {}\n\n",
            counts.created, counts.skipped, counts.errors
        );
        for entry in self.entries.iter().filter(|e| e.outcome == Outcome::Created) {
            let _ = writeln!(out, "CREATED: {} - {}", entry.project, entry.summary);
        }
        for entry in self.entries.iter().filter(|e| e.outcome == Outcome::Skipped) {
            let _ = writeln!(out, "SKIPPED: {} - {}", entry.project, entry.summary);
        }
        for entry in &self.entries {
            if let Outcome::Error(reason) = &entry.outcome {
                let _ = writeln!(out, "ERROR: {} - {} ({reason})", entry.project, entry.summary);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DateRule;

    fn def(project: &str, summary: &str) -> IssueDefinition {
        IssueDefinition::new(project, summary, DateRule::Daily)
    }

    #[test]
    fn empty_ledger_summary() {
        assert_eq!(ResultLedger::new().render_summary(), "No issues have been detected.\n");
    }

    #[test]
    fn summary_groups_by_outcome() {
        let mut ledger = ResultLedger::new();
        ledger.record(&def("OPS", "b"), Outcome::Skipped);
        ledger.record(&def("GHOST", "c"), Outcome::Error(IssueError::ProjectNotFound));
        ledger.record(&def("OPS", "a"), Outcome::Created);

        let summary = ledger.render_summary();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines[0], "Created: 1, Skipped: 1, Errors: 1");
        assert_eq!(lines[2], "CREATED: OPS - a");
        assert_eq!(lines[3], "SKIPPED: OPS - b");
        assert_eq!(lines[4], "ERROR: GHOST - c (project not found)");
    }

    #[test]
    fn outcomes_keep_record_order() {
        let mut ledger = ResultLedger::new();
        ledger.record(&def("OPS", "a"), Outcome::Skipped);
        ledger.record(&def("OPS", "b"), Outcome::Created);
        let outcomes: Vec<_> = ledger.outcomes().cloned().collect();
        assert_eq!(outcomes, vec![Outcome::Skipped, Outcome::Created]);
        assert_eq!(ledger.counts(), Counts { created: 1, skipped: 1, errors: 0 });
    }

    #[test]
    fn rejection_reason_includes_status() {
        let err = IssueError::CreationRejected { status: 400 };
        assert_eq!(err.to_string(), "creation rejected (HTTP 400)");
    }
}

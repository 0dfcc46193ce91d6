//! Run coordinator: load, resolve, process every definition, report.
//!
//! ```text
//! Idle -> Loading -> Resolving -> Processing -> Reporting -> Done
//!            \           \
//!             +-----------+-----> Reporting -> Aborted
//! ```
//!
//! Loading and resolving failures abort the run, but every path passes
//! through `Reporting`: the report is rendered and handed to the mailer
//! before [`RunCoordinator::run`] returns.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::context::ServiceContext;
use crate::definition::IssueDefinition;
use crate::issue::{assemble, ProjectDirectory, ProjectSchemaProvider};
use crate::ledger::{IssueError, Outcome, ResultLedger};
use crate::logging::LogCapture;
use crate::ports::TrackerError;
use crate::report::RunReport;
use crate::store::{DefinitionStore, StoreError};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started.
    Idle,
    /// Loading issue definitions.
    Loading,
    /// Fetching the project directory.
    Resolving,
    /// Evaluating and creating issues.
    Processing,
    /// Rendering and delivering the report.
    Reporting,
    /// Finished normally.
    Done,
    /// Stopped early on a fatal failure; the report was still attempted.
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Resolving => "resolving",
            Self::Processing => "processing",
            Self::Reporting => "reporting",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Where a run gets its definitions from.
pub trait DefinitionSource {
    /// Loads all definitions, in processing order.
    ///
    /// # Errors
    ///
    /// Returns an error when the definitions cannot be loaded at all.
    fn load(&self) -> Result<Vec<IssueDefinition>, StoreError>;
}

impl DefinitionSource for DefinitionStore<'_> {
    fn load(&self) -> Result<Vec<IssueDefinition>, StoreError> {
        self.load_all()
    }
}

impl DefinitionSource for Vec<IssueDefinition> {
    fn load(&self) -> Result<Vec<IssueDefinition>, StoreError> {
        Ok(self.clone())
    }
}

/// Sequences one run against the ports of a [`ServiceContext`].
pub struct RunCoordinator<'c> {
    ctx: &'c ServiceContext,
    state: RunState,
}

impl<'c> RunCoordinator<'c> {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new(ctx: &'c ServiceContext) -> Self {
        Self { ctx, state: RunState::Idle }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Runs to completion and delivers the report.
    ///
    /// Never fails: fatal problems end in [`RunState::Aborted`] and are
    /// described in the returned report, which has already been handed to
    /// the mailer together with the contents of `log`.
    pub async fn run(&mut self, source: &dyn DefinitionSource, log: &LogCapture) -> RunReport {
        let today = self.ctx.clock.today();
        info!(date = %today.format("%d-%m-%Y"), "Starting");

        let mut ledger = ResultLedger::new();
        let result = self.execute(source, today, &mut ledger).await;

        self.transition(RunState::Reporting);
        let abort_reason = result.err();
        let mut report = RunReport {
            date: today,
            state: if abort_reason.is_some() { RunState::Aborted } else { RunState::Done },
            abort_reason,
            ledger,
            delivered: false,
        };

        let counts = report.ledger.counts();
        info!(
            created = counts.created,
            skipped = counts.skipped,
            errors = counts.errors,
            "Run finished"
        );

        let rendered = report.render(&log.contents());
        match self.ctx.mailer.send(&rendered).await {
            Ok(()) => report.delivered = true,
            Err(e) => {
                error!(channel = self.ctx.mailer.channel_name(), error = %e, "Failed to deliver report");
            }
        }

        self.transition(report.state);
        report
    }

    async fn execute(
        &mut self,
        source: &dyn DefinitionSource,
        today: NaiveDate,
        ledger: &mut ResultLedger,
    ) -> Result<(), String> {
        self.transition(RunState::Loading);
        let definitions = source.load().map_err(|e| {
            error!(error = %e, "Unable to load issue definitions");
            e.to_string()
        })?;
        if definitions.is_empty() {
            warn!("No issues have been found to generate.");
            return Ok(());
        }

        self.transition(RunState::Resolving);
        let directory = ProjectDirectory::fetch(self.ctx.tracker.as_ref()).await.map_err(|e| {
            error!(
                error = %e,
                "Unable to retrieve projects from the tracker, ensure credentials are correct and \
                 this machine is able to communicate with the tracker instance."
            );
            e.to_string()
        })?;

        self.transition(RunState::Processing);
        let mut schemas = ProjectSchemaProvider::new(self.ctx.tracker.as_ref());
        for definition in &definitions {
            let outcome = self.process(definition, today, &directory, &mut schemas).await;
            ledger.record(definition, outcome);
        }
        Ok(())
    }

    async fn process(
        &self,
        definition: &IssueDefinition,
        today: NaiveDate,
        directory: &ProjectDirectory,
        schemas: &mut ProjectSchemaProvider<'_>,
    ) -> Outcome {
        let label = definition.label();
        if !definition.is_due(today) {
            info!("Issue {label}: SKIPPED");
            return Outcome::Skipped;
        }

        let Some(project_id) = directory.resolve(&definition.project) else {
            error!(project = %definition.project, "Project {} is not found.", definition.project);
            return Outcome::Error(IssueError::ProjectNotFound);
        };

        info!("Generating {label}");
        let schema = if definition.custom_fields.is_empty() {
            None
        } else {
            schemas.schema_for(&definition.project).await
        };
        let payload = assemble(definition, project_id, schema);

        match self.ctx.tracker.create_issue(&payload).await {
            Ok(created) => {
                info!(issue = ?created.id_readable, "Created {label}: SUCCESS");
                Outcome::Created
            }
            Err(TrackerError::Status { status, body }) => {
                error!(
                    status,
                    %body,
                    "Cannot create issue {} in project {}. Ensure all field names are valid and correct.",
                    definition.summary,
                    definition.project
                );
                Outcome::Error(IssueError::CreationRejected { status })
            }
            Err(e) => {
                error!(error = %e, "Cannot create issue {label}");
                Outcome::Error(IssueError::CreationFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixed::FixedClock;
    use crate::adapters::live::LiveFileSystem;
    use crate::adapters::memory::{MemoryMailer, MemoryTracker};
    use crate::schedule::DateRule;
    use std::sync::Arc;

    struct Harness {
        ctx: ServiceContext,
        tracker: Arc<MemoryTracker>,
        mailer: Arc<MemoryMailer>,
    }

    fn harness(tracker: MemoryTracker, mailer: MemoryMailer, today: (i32, u32, u32)) -> Harness {
        let tracker = Arc::new(tracker);
        let mailer = Arc::new(mailer);
        let date = NaiveDate::from_ymd_opt(today.0, today.1, today.2).unwrap();
        let ctx = ServiceContext {
            clock: Box::new(FixedClock(date)),
            fs: Box::new(LiveFileSystem),
            tracker: Box::new(Arc::clone(&tracker)),
            mailer: Box::new(Arc::clone(&mailer)),
        };
        Harness { ctx, tracker, mailer }
    }

    struct FailingSource;

    impl DefinitionSource for FailingSource {
        fn load(&self) -> Result<Vec<IssueDefinition>, StoreError> {
            Err(StoreError::MissingRoot("/nowhere".into()))
        }
    }

    #[tokio::test]
    async fn classifies_created_missing_project_and_skipped() {
        // 2 May 2024 is a Thursday, so the Wednesday rule is not due.
        let h = harness(
            MemoryTracker::new().with_project("0-1", "OPS"),
            MemoryMailer::new(),
            (2024, 5, 2),
        );
        let defs = vec![
            IssueDefinition::new("OPS", "daily", DateRule::Daily),
            IssueDefinition::new("GHOST", "daily", DateRule::Daily),
            IssueDefinition::new("OPS", "wednesday", DateRule::Weekly(3)),
        ];

        let mut coordinator = RunCoordinator::new(&h.ctx);
        let report = coordinator.run(&defs, &LogCapture::new()).await;

        let outcomes: Vec<_> = report.ledger.outcomes().cloned().collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Created, Outcome::Error(IssueError::ProjectNotFound), Outcome::Skipped]
        );
        assert_eq!(report.state, RunState::Done);
        assert_eq!(coordinator.state(), RunState::Done);
        assert!(report.delivered);
        assert_eq!(h.tracker.created().len(), 1);

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        let count = |prefix: &str| sent[0].body.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("CREATED: "), 1);
        assert_eq!(count("ERROR: "), 1);
        assert_eq!(count("SKIPPED: "), 1);
        assert!(sent[0].body.contains("CREATED: OPS - daily\n"));
        assert!(sent[0].body.contains("SKIPPED: OPS - wednesday\n"));
        assert!(sent[0].body.contains("ERROR: GHOST - daily (project not found)\n"));
    }

    #[tokio::test]
    async fn malformed_weekday_is_skipped_while_the_batch_runs() {
        let h = harness(
            MemoryTracker::new().with_project("0-1", "OPS"),
            MemoryMailer::new(),
            (2024, 5, 6),
        );
        let defs = vec![
            IssueDefinition::from_yaml("project: OPS\nsummary: a\ndate: daily\n").unwrap(),
            IssueDefinition::from_yaml(
                "project: OPS\nsummary: b\ndate: weekly\nday-of-week: monday\n",
            )
            .unwrap(),
        ];

        let report = RunCoordinator::new(&h.ctx).run(&defs, &LogCapture::new()).await;
        assert!(!report.aborted());
        let outcomes: Vec<_> = report.ledger.outcomes().cloned().collect();
        assert_eq!(outcomes, vec![Outcome::Created, Outcome::Skipped]);
        assert_eq!(h.tracker.created().len(), 1);
    }

    #[tokio::test]
    async fn rejected_creation_does_not_stop_the_batch() {
        let tracker = MemoryTracker::new()
            .with_project("0-1", "OPS")
            .with_project("0-2", "SEC")
            .rejecting("0-1");
        let h = harness(tracker, MemoryMailer::new(), (2024, 5, 1));
        let defs = vec![
            IssueDefinition::new("OPS", "a", DateRule::Daily),
            IssueDefinition::new("SEC", "b", DateRule::Daily),
        ];

        let report = RunCoordinator::new(&h.ctx).run(&defs, &LogCapture::new()).await;
        let outcomes: Vec<_> = report.ledger.outcomes().cloned().collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Error(IssueError::CreationRejected { status: 400 }), Outcome::Created]
        );
    }

    #[tokio::test]
    async fn directory_failure_aborts_but_still_reports() {
        let h = harness(MemoryTracker::new().with_failing_listing(), MemoryMailer::new(), (2024, 5, 1));
        let defs = vec![IssueDefinition::new("OPS", "a", DateRule::Daily)];

        let mut coordinator = RunCoordinator::new(&h.ctx);
        let report = coordinator.run(&defs, &LogCapture::new()).await;

        assert_eq!(report.state, RunState::Aborted);
        assert_eq!(coordinator.state(), RunState::Aborted);
        assert!(report.ledger.entries().is_empty());
        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Run aborted"));
    }

    #[tokio::test]
    async fn load_failure_aborts_but_still_reports() {
        let h = harness(MemoryTracker::new(), MemoryMailer::new(), (2024, 5, 1));
        let report = RunCoordinator::new(&h.ctx).run(&FailingSource, &LogCapture::new()).await;
        assert!(report.aborted());
        assert!(report.abort_reason.unwrap().contains("/nowhere"));
        assert_eq!(h.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn empty_definition_set_reports_nothing_detected() {
        let h = harness(MemoryTracker::new().with_failing_listing(), MemoryMailer::new(), (2024, 5, 1));
        let report = RunCoordinator::new(&h.ctx).run(&Vec::new(), &LogCapture::new()).await;
        assert_eq!(report.state, RunState::Done);
        assert!(h.mailer.sent()[0].body.contains("No issues have been detected."));
    }

    #[tokio::test]
    async fn schema_is_fetched_once_per_project_and_only_when_needed() {
        let tracker = MemoryTracker::new()
            .with_project("0-1", "OPS")
            .with_fields("OPS", &[("Assignee", "SingleUserIssueCustomField")]);
        let h = harness(tracker, MemoryMailer::new(), (2024, 5, 1));
        let defs = vec![
            IssueDefinition::new("OPS", "plain", DateRule::Daily),
            IssueDefinition::new("OPS", "a", DateRule::Daily).with_field("Assignee", "alice"),
            IssueDefinition::new("OPS", "b", DateRule::Daily).with_field("Assignee", "bob"),
        ];

        RunCoordinator::new(&h.ctx).run(&defs, &LogCapture::new()).await;
        assert_eq!(h.tracker.sample_calls(), vec!["OPS".to_string()]);
        let created = h.tracker.created();
        assert!(created[0].custom_fields.is_none());
        assert_eq!(created[2].custom_fields.as_ref().unwrap()[0].name, "Assignee");
    }

    #[tokio::test]
    async fn mail_failure_is_recorded_not_raised() {
        let h = harness(MemoryTracker::new().with_project("0-1", "OPS"), MemoryMailer::failing(), (2024, 5, 1));
        let defs = vec![IssueDefinition::new("OPS", "a", DateRule::Daily)];
        let report = RunCoordinator::new(&h.ctx).run(&defs, &LogCapture::new()).await;
        assert_eq!(report.state, RunState::Done);
        assert!(!report.delivered);
    }
}

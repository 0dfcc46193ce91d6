//! Dry-run tracker: real lookups, no issue creation.

use tracing::info;

use crate::issue::IssuePayload;
use crate::ports::tracker::{CreatedIssue, FieldSample, ProjectRecord, Tracker, TrackerFuture};

/// Delegates lookups to an inner tracker but only logs creation requests.
pub struct DryRunTracker {
    inner: Box<dyn Tracker>,
}

impl DryRunTracker {
    /// Wraps `inner`, whose creation endpoint will never be called.
    pub fn new(inner: Box<dyn Tracker>) -> Self {
        Self { inner }
    }
}

impl Tracker for DryRunTracker {
    fn list_projects(&self) -> TrackerFuture<'_, Vec<ProjectRecord>> {
        self.inner.list_projects()
    }

    fn sample_custom_fields<'a>(
        &'a self,
        project: &'a str,
    ) -> TrackerFuture<'a, Option<Vec<FieldSample>>> {
        self.inner.sample_custom_fields(project)
    }

    fn create_issue<'a>(&'a self, payload: &'a IssuePayload) -> TrackerFuture<'a, CreatedIssue> {
        Box::pin(async move {
            let body = serde_json::to_string(payload).unwrap_or_else(|e| format!("<{e}>"));
            info!(summary = %payload.summary, %body, "dry run: issue not submitted");
            Ok(CreatedIssue::default())
        })
    }
}

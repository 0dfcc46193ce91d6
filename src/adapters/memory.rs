//! In-memory tracker and mailer.
//!
//! Both record every call so tests can assert on what a run did without a
//! network. The tracker is configured with builder methods describing the
//! projects, their sampled fields and which calls should fail.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::issue::IssuePayload;
use crate::ports::mailer::{MailError, MailFuture, Mailer, Report};
use crate::ports::tracker::{
    CreatedIssue, FieldSample, ProjectRecord, Tracker, TrackerError, TrackerFuture,
};

/// Tracker backed by in-memory project and field data.
#[derive(Default)]
pub struct MemoryTracker {
    projects: Vec<ProjectRecord>,
    listing_fails: bool,
    fields: HashMap<String, Vec<FieldSample>>,
    failing_samples: HashSet<String>,
    rejected_projects: HashSet<String>,
    created: Mutex<Vec<IssuePayload>>,
    sample_calls: Mutex<Vec<String>>,
}

impl MemoryTracker {
    /// Creates a tracker with no projects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project.
    #[must_use]
    pub fn with_project(mut self, id: &str, short_name: &str) -> Self {
        self.projects.push(ProjectRecord {
            id: id.to_string(),
            name: short_name.to_string(),
            short_name: short_name.to_string(),
        });
        self
    }

    /// Gives `short_name` an existing issue carrying these `(name, type)` fields.
    #[must_use]
    pub fn with_fields(mut self, short_name: &str, fields: &[(&str, &str)]) -> Self {
        self.fields.insert(
            short_name.to_string(),
            fields
                .iter()
                .map(|(name, ty)| FieldSample {
                    name: (*name).to_string(),
                    server_type: (*ty).to_string(),
                })
                .collect(),
        );
        self
    }

    /// Makes the field sample for `short_name` fail with HTTP 500.
    #[must_use]
    pub fn with_failing_sample(mut self, short_name: &str) -> Self {
        self.failing_samples.insert(short_name.to_string());
        self
    }

    /// Makes creation in project `project_id` fail with HTTP 400.
    #[must_use]
    pub fn rejecting(mut self, project_id: &str) -> Self {
        self.rejected_projects.insert(project_id.to_string());
        self
    }

    /// Makes the project listing fail with HTTP 401.
    #[must_use]
    pub fn with_failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Payloads accepted so far.
    #[must_use]
    pub fn created(&self) -> Vec<IssuePayload> {
        self.created.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Projects sampled so far, in call order.
    #[must_use]
    pub fn sample_calls(&self) -> Vec<String> {
        self.sample_calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Tracker for MemoryTracker {
    fn list_projects(&self) -> TrackerFuture<'_, Vec<ProjectRecord>> {
        Box::pin(async move {
            if self.listing_fails {
                return Err(TrackerError::Status { status: 401, body: "unauthorized".into() });
            }
            Ok(self.projects.clone())
        })
    }

    fn sample_custom_fields<'a>(
        &'a self,
        project: &'a str,
    ) -> TrackerFuture<'a, Option<Vec<FieldSample>>> {
        Box::pin(async move {
            self.sample_calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(project.to_string());
            if self.failing_samples.contains(project) {
                return Err(TrackerError::Status { status: 500, body: "boom".into() });
            }
            Ok(self.fields.get(project).cloned())
        })
    }

    fn create_issue<'a>(&'a self, payload: &'a IssuePayload) -> TrackerFuture<'a, CreatedIssue> {
        Box::pin(async move {
            if self.rejected_projects.contains(&payload.project.id) {
                return Err(TrackerError::Status { status: 400, body: "invalid field".into() });
            }
            let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
            created.push(payload.clone());
            Ok(CreatedIssue {
                id: Some(format!("2-{}", created.len())),
                id_readable: Some(format!("ISSUE-{}", created.len())),
            })
        })
    }
}

/// Mailer that keeps delivered reports in memory.
#[derive(Default)]
pub struct MemoryMailer {
    fails: bool,
    sent: Mutex<Vec<Report>>,
}

impl MemoryMailer {
    /// Creates a mailer that accepts every report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mailer whose every send fails.
    #[must_use]
    pub fn failing() -> Self {
        Self { fails: true, ..Self::default() }
    }

    /// Reports delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Report> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Mailer for MemoryMailer {
    fn send<'a>(&'a self, report: &'a Report) -> MailFuture<'a> {
        Box::pin(async move {
            if self.fails {
                return Err(MailError::Smtp("connection refused".into()));
            }
            self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(report.clone());
            Ok(())
        })
    }

    fn channel_name(&self) -> &str {
        "memory"
    }
}

//! Issue tracker port for the three calls a run makes.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::issue::IssuePayload;

/// Boxed future type alias used by [`Tracker`] to keep the trait dyn-compatible.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TrackerError>> + Send + 'a>>;

/// Errors returned by tracker calls.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request never produced a response (connect failure, timeout, TLS).
    #[error("tracker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The tracker answered with a non-success status.
    #[error("tracker returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected tracker response: {0}")]
    Decode(String),
}

/// A project visible to the configured credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Tracker-internal project id (e.g. `0-7`).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Short name used in issue ids and definitions (e.g. `OPS`).
    #[serde(rename = "shortName")]
    pub short_name: String,
}

/// One custom field as it appears on an existing issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSample {
    /// Field name as configured in the project.
    pub name: String,
    /// Server-side type tag, sent back verbatim as `$type` on creation.
    #[serde(rename = "$type")]
    pub server_type: String,
}

/// Identifiers of a newly created issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Tracker-internal issue id.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable issue id (e.g. `OPS-42`).
    #[serde(default, rename = "idReadable")]
    pub id_readable: Option<String>,
}

/// Talks to the remote issue tracker.
pub trait Tracker: Send + Sync {
    /// Lists every project visible to the credential.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn list_projects(&self) -> TrackerFuture<'_, Vec<ProjectRecord>>;

    /// Reads the custom fields of one arbitrary issue in `project`.
    ///
    /// Returns `Ok(None)` when the project has no issues.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn sample_custom_fields<'a>(
        &'a self,
        project: &'a str,
    ) -> TrackerFuture<'a, Option<Vec<FieldSample>>>;

    /// Submits a creation request.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Status`] when the tracker rejects the issue.
    fn create_issue<'a>(&'a self, payload: &'a IssuePayload) -> TrackerFuture<'a, CreatedIssue>;
}

impl<T: Tracker + ?Sized> Tracker for std::sync::Arc<T> {
    fn list_projects(&self) -> TrackerFuture<'_, Vec<ProjectRecord>> {
        (**self).list_projects()
    }

    fn sample_custom_fields<'a>(
        &'a self,
        project: &'a str,
    ) -> TrackerFuture<'a, Option<Vec<FieldSample>>> {
        (**self).sample_custom_fields(project)
    }

    fn create_issue<'a>(&'a self, payload: &'a IssuePayload) -> TrackerFuture<'a, CreatedIssue> {
        (**self).create_issue(payload)
    }
}

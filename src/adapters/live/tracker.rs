//! Live adapter for the `Tracker` port using the YouTrack REST API.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::issue::IssuePayload;
use crate::ports::tracker::{
    CreatedIssue, FieldSample, ProjectRecord, Tracker, TrackerError, TrackerFuture,
};

const PROJECT_FIELDS: &str = "id,name,shortName";
const SAMPLE_FIELDS: &str = "idReadable,id,customFields(name,$type,value(name,login))";
const CREATED_FIELDS: &str = "id,idReadable";
const MAX_ERROR_BODY: usize = 512;

/// Live tracker client authenticated with a bearer token.
pub struct LiveTracker {
    client: Client,
    base_url: String,
    token: String,
}

impl LiveTracker {
    /// Creates a client for the configured tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }
}

/// An issue as returned by the sample search; only its fields matter.
#[derive(Deserialize)]
struct SampledIssue {
    #[serde(default, rename = "customFields")]
    custom_fields: Vec<FieldSample>,
}

/// Reads the body, mapping non-success statuses to [`TrackerError::Status`].
async fn read_body(response: Response) -> Result<String, TrackerError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        let mut body = text;
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
            body.truncate(cut);
        }
        return Err(TrackerError::Status { status: status.as_u16(), body });
    }
    debug!(body = %text, "tracker response");
    Ok(text)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TrackerError> {
    let text = read_body(response).await?;
    serde_json::from_str(&text).map_err(|e| TrackerError::Decode(e.to_string()))
}

impl Tracker for LiveTracker {
    fn list_projects(&self) -> TrackerFuture<'_, Vec<ProjectRecord>> {
        Box::pin(async move {
            let url = self.url("api/admin/projects");
            debug!(%url, "Sending GET request");
            let response = self
                .authorized(self.client.get(&url))
                .query(&[("fields", PROJECT_FIELDS)])
                .send()
                .await?;
            decode(response).await
        })
    }

    fn sample_custom_fields<'a>(
        &'a self,
        project: &'a str,
    ) -> TrackerFuture<'a, Option<Vec<FieldSample>>> {
        Box::pin(async move {
            let url = self.url("api/issues");
            let query = format!("in:{project}");
            debug!(%url, %query, "Sending GET request");
            let response = self
                .authorized(self.client.get(&url))
                .query(&[("fields", SAMPLE_FIELDS), ("query", query.as_str()), ("$top", "1")])
                .send()
                .await?;
            let issues: Vec<SampledIssue> = decode(response).await?;
            Ok(issues.into_iter().next().map(|issue| issue.custom_fields))
        })
    }

    fn create_issue<'a>(&'a self, payload: &'a IssuePayload) -> TrackerFuture<'a, CreatedIssue> {
        Box::pin(async move {
            let url = self.url("api/issues");
            debug!(%url, payload = ?payload, "Sending POST request");
            let response = self
                .authorized(self.client.post(&url))
                .query(&[("fields", CREATED_FIELDS)])
                .json(payload)
                .send()
                .await?;
            // A success status means the issue exists, whatever the body holds.
            let text = read_body(response).await?;
            Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, "issue created but response body was unreadable");
                CreatedIssue::default()
            }))
        })
    }
}

//! Project short name to internal id lookup.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::ports::{ProjectRecord, Tracker, TrackerError};

/// Snapshot of the tracker's projects, keyed by short name.
#[derive(Debug, Clone, Default)]
pub struct ProjectDirectory {
    ids: HashMap<String, String>,
}

impl ProjectDirectory {
    /// Fetches the project listing once and indexes it.
    ///
    /// # Errors
    ///
    /// Returns the tracker error when the listing cannot be retrieved.
    pub async fn fetch(tracker: &dyn Tracker) -> Result<Self, TrackerError> {
        info!("Getting project data from the tracker");
        let records = tracker.list_projects().await?;
        let directory = Self::from_records(records);
        info!(projects = directory.len(), "Retrieve project data: SUCCESS");
        Ok(directory)
    }

    /// Indexes an already retrieved project listing.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ProjectRecord>) -> Self {
        let ids = records
            .into_iter()
            .inspect(|p| debug!(short_name = %p.short_name, id = %p.id, name = %p.name, "project"))
            .map(|p| (p.short_name, p.id))
            .collect();
        Self { ids }
    }

    /// Returns the internal id for `short_name`, or `None` if unknown.
    #[must_use]
    pub fn resolve(&self, short_name: &str) -> Option<&str> {
        self.ids.get(short_name).map(String::as_str)
    }

    /// Number of known projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when no projects are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Per-project custom field schema discovery.
//!
//! The creation endpoint needs each custom field's server-side type tag,
//! which is read off one existing issue in the project. Fields that no
//! existing issue has set stay invisible.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::ports::{FieldSample, Tracker};

/// Ordered `(name, serverType)` pairs discovered for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSample>,
}

impl FieldSchema {
    /// Wraps discovered fields, keeping their order.
    #[must_use]
    pub fn new(fields: Vec<FieldSample>) -> Self {
        Self { fields }
    }

    /// Fields in discovery order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSample] {
        &self.fields
    }

    /// Server type of the first field named `name`.
    #[must_use]
    pub fn server_type(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.server_type.as_str())
    }
}

/// Resolves and memoizes field schemas for the duration of one run.
///
/// Each project is sampled at most once; an unavailable schema is
/// remembered too, so a failing project is not retried per definition.
pub struct ProjectSchemaProvider<'t> {
    tracker: &'t dyn Tracker,
    cache: HashMap<String, Option<FieldSchema>>,
}

impl<'t> ProjectSchemaProvider<'t> {
    /// Creates an empty provider backed by `tracker`.
    #[must_use]
    pub fn new(tracker: &'t dyn Tracker) -> Self {
        Self { tracker, cache: HashMap::new() }
    }

    /// Returns the schema for `project`, or `None` when it is unavailable.
    pub async fn schema_for(&mut self, project: &str) -> Option<&FieldSchema> {
        if !self.cache.contains_key(project) {
            let schema = self.discover(project).await;
            self.cache.insert(project.to_string(), schema);
        }
        self.cache.get(project).and_then(Option::as_ref)
    }

    async fn discover(&self, project: &str) -> Option<FieldSchema> {
        info!(project, "Retrieving custom field information");
        match self.tracker.sample_custom_fields(project).await {
            Ok(Some(fields)) => {
                debug!(project, fields = fields.len(), "custom field schema discovered");
                Some(FieldSchema::new(fields))
            }
            Ok(None) => {
                warn!(project, "project has no issues to sample; custom fields will be omitted");
                None
            }
            Err(e) => {
                warn!(project, error = %e, "custom field lookup failed; custom fields will be omitted");
                None
            }
        }
    }
}

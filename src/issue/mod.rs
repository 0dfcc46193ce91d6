//! Turning due definitions into tracker creation payloads.
//!
//! [`ProjectDirectory`] maps short names to project ids, the
//! [`ProjectSchemaProvider`] discovers custom field types per project, and
//! [`assemble`] combines both with a definition.

mod assemble;
mod directory;
mod schema;

pub use assemble::assemble;
pub use directory::ProjectDirectory;
pub use schema::{FieldSchema, ProjectSchemaProvider};

use serde::Serialize;

/// Name of the custom field whose value is addressed by login.
pub const ASSIGNEE_FIELD: &str = "Assignee";

/// Body of an issue creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuePayload {
    /// Target project.
    pub project: ProjectRef,
    /// Issue summary.
    pub summary: String,
    /// Issue description.
    pub description: String,
    /// Custom field values; omitted entirely when none were requested or
    /// the project schema was unavailable.
    #[serde(rename = "customFields", skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,
}

/// Reference to a project by internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    /// Tracker-internal project id.
    pub id: String,
}

/// One custom field entry of a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomFieldValue {
    /// Field name.
    pub name: String,
    /// Server-side type tag discovered from the project schema.
    #[serde(rename = "$type")]
    pub server_type: String,
    /// Field value.
    pub value: FieldValue,
}

/// Value object of a custom field entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A user addressed by login.
    Login {
        /// User login.
        login: String,
    },
    /// An enum-like value addressed by name.
    Name {
        /// Value name.
        name: String,
    },
}

impl FieldValue {
    /// Builds the value shape the tracker expects for `field`.
    #[must_use]
    pub fn for_field(field: &str, raw: &str) -> Self {
        if field == ASSIGNEE_FIELD {
            Self::Login { login: raw.to_string() }
        } else {
            Self::Name { name: raw.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_without_fields_omits_key() {
        let payload = IssuePayload {
            project: ProjectRef { id: "0-1".into() },
            summary: "s".into(),
            description: "d".into(),
            custom_fields: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"project": {"id": "0-1"}, "summary": "s", "description": "d"})
        );
    }

    #[test]
    fn custom_field_serializes_type_tag_and_value() {
        let payload = IssuePayload {
            project: ProjectRef { id: "0-1".into() },
            summary: "s".into(),
            description: String::new(),
            custom_fields: Some(vec![CustomFieldValue {
                name: "Assignee".into(),
                server_type: "SingleUserIssueCustomField".into(),
                value: FieldValue::for_field("Assignee", "alice"),
            }]),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["customFields"],
            json!([{
                "name": "Assignee",
                "$type": "SingleUserIssueCustomField",
                "value": {"login": "alice"}
            }])
        );
    }
}

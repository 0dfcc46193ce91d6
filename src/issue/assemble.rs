//! Building creation payloads from definitions.

use std::collections::HashSet;

use tracing::debug;

use super::{CustomFieldValue, FieldSchema, FieldValue, IssuePayload, ProjectRef};
use crate::definition::IssueDefinition;

/// Combines a definition, its resolved project id and the project's field
/// schema into a creation payload.
///
/// Custom fields are emitted in schema order. Requested fields the schema
/// does not know are dropped without error. When no fields were requested,
/// or the schema is unavailable, the payload carries no custom fields at all.
#[must_use]
pub fn assemble(
    definition: &IssueDefinition,
    project_id: &str,
    schema: Option<&FieldSchema>,
) -> IssuePayload {
    let custom_fields = if definition.custom_fields.is_empty() {
        None
    } else {
        schema.map(|schema| custom_field_values(definition, schema))
    };

    IssuePayload {
        project: ProjectRef { id: project_id.to_string() },
        summary: definition.summary.clone(),
        description: definition.description.clone(),
        custom_fields,
    }
}

fn custom_field_values(definition: &IssueDefinition, schema: &FieldSchema) -> Vec<CustomFieldValue> {
    let mut seen = HashSet::new();
    let values: Vec<_> = schema
        .fields()
        .iter()
        .filter_map(|field| {
            let raw = definition.custom_fields.get(&field.name)?;
            seen.insert(field.name.as_str()).then(|| CustomFieldValue {
                name: field.name.clone(),
                server_type: field.server_type.clone(),
                value: FieldValue::for_field(&field.name, raw),
            })
        })
        .collect();

    for name in definition.custom_fields.keys().filter(|n| !seen.contains(n.as_str())) {
        debug!(project = %definition.project, field = %name, "custom field not in project schema, dropped");
    }
    values
}

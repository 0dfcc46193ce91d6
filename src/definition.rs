//! Issue definitions as loaded from the definition store.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_yaml::Value;

use crate::schedule::{self, DateRule, RuleError};

/// One declarative issue definition, immutable for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDefinition {
    /// Short name of the target tracker project.
    pub project: String,
    /// Issue summary, used verbatim.
    pub summary: String,
    /// Issue description, used verbatim.
    pub description: String,
    /// When the issue is due, or why the rule was rejected.
    pub rule: Result<DateRule, RuleError>,
    /// Requested custom field values keyed by field name.
    pub custom_fields: BTreeMap<String, String>,
}

/// On-disk shape of a definition document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawDefinition {
    #[serde(default)]
    project: Value,
    summary: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    day_of_week: Value,
    #[serde(default)]
    custom_fields: Option<BTreeMap<String, Value>>,
}

impl IssueDefinition {
    /// Builds a definition with a valid rule and no custom fields.
    #[must_use]
    pub fn new(project: &str, summary: &str, rule: DateRule) -> Self {
        Self {
            project: project.to_string(),
            summary: summary.to_string(),
            description: String::new(),
            rule: Ok(rule),
            custom_fields: BTreeMap::new(),
        }
    }

    /// Adds a requested custom field value.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.custom_fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Parses a single YAML definition document.
    ///
    /// An unrecognized date rule or `day-of-week` does not fail parsing; it
    /// is kept as the rejection reason and the definition never matches.
    /// Scalar `project`, `summary` and `description` values are taken as
    /// text; anything else becomes empty.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is not valid YAML or lacks the
    /// `summary` key.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let raw: RawDefinition = serde_yaml::from_str(contents)?;
        let rule = DateRule::from_raw(&raw.date, &raw.day_of_week);
        let custom_fields = raw
            .custom_fields
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| scalar_to_string(&value).map(|v| (name, v)))
            .collect();

        Ok(Self {
            project: scalar_to_string(&raw.project).unwrap_or_default().trim().to_string(),
            summary: scalar_to_string(&raw.summary).unwrap_or_default(),
            description: scalar_to_string(&raw.description).unwrap_or_default(),
            rule,
            custom_fields,
        })
    }

    /// Returns `true` when the definition's rule is valid and due on `today`.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.rule.as_ref().is_ok_and(|rule| schedule::matches(rule, today))
    }

    /// `<project> - <summary>`, as used in logs and reports.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.project, self.summary)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let yaml = r"
project: OPS
summary: Rotate backups
description: Swap the offsite tapes.
date: weekly
day-of-week: 1
custom-fields:
  Assignee: alice
  Priority: Major
";
        let def = IssueDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.project, "OPS");
        assert_eq!(def.summary, "Rotate backups");
        assert_eq!(def.description, "Swap the offsite tapes.");
        assert_eq!(def.rule, Ok(DateRule::Weekly(1)));
        assert_eq!(def.custom_fields.get("Assignee").map(String::as_str), Some("alice"));
        assert_eq!(def.custom_fields.len(), 2);
    }

    #[test]
    fn description_and_fields_are_optional() {
        let def = IssueDefinition::from_yaml("project: OPS\nsummary: Daily check\ndate: daily\n")
            .unwrap();
        assert!(def.description.is_empty());
        assert!(def.custom_fields.is_empty());
        assert_eq!(def.rule, Ok(DateRule::Daily));
    }

    #[test]
    fn unrecognized_rule_is_kept_and_never_due() {
        let def =
            IssueDefinition::from_yaml("project: OPS\nsummary: x\ndate: \"32-13-2030\"\n").unwrap();
        assert!(def.rule.is_err());
        let today = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
        assert!(!def.is_due(today));
    }

    #[test]
    fn weekday_name_is_rejected_rule_not_parse_error() {
        let def = IssueDefinition::from_yaml(
            "project: OPS\nsummary: x\ndate: weekly\nday-of-week: monday\n",
        )
        .unwrap();
        assert!(matches!(def.rule, Err(RuleError::InvalidWeekday(_))));
        assert!(!def.is_due(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()));
    }

    #[test]
    fn scalar_project_and_summary_are_text() {
        let def = IssueDefinition::from_yaml("project: 42\nsummary: 2024\ndate: daily\n").unwrap();
        assert_eq!(def.project, "42");
        assert_eq!(def.summary, "2024");

        let def =
            IssueDefinition::from_yaml("project: [OPS]\nsummary: x\ndate: daily\n").unwrap();
        assert!(def.project.is_empty());
    }

    #[test]
    fn missing_summary_fails() {
        assert!(IssueDefinition::from_yaml("project: OPS\ndate: daily\n").is_err());
    }

    #[test]
    fn numeric_field_values_become_strings() {
        let yaml = "project: OPS\nsummary: x\ndate: 1\ncustom-fields:\n  Estimate: 3\n";
        let def = IssueDefinition::from_yaml(yaml).unwrap();
        assert_eq!(def.custom_fields.get("Estimate").map(String::as_str), Some("3"));
        assert_eq!(def.rule, Ok(DateRule::DayOfMonth(1)));
    }
}

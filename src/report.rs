//! Final run report and its plain-text rendering.

use chrono::NaiveDate;

use crate::ledger::ResultLedger;
use crate::ports::mailer::Report;
use crate::run::RunState;

/// Header line opening the report body.
pub const SUMMARY_HEADER: &str = "##### Issue Generator Summary #####";

/// Everything a finished (or aborted) run hands to the mailer.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Date the run was evaluated for.
    pub date: NaiveDate,
    /// Terminal state: `Done` or `Aborted`.
    pub state: RunState,
    /// Why the run aborted, if it did.
    pub abort_reason: Option<String>,
    /// Per-definition outcomes.
    pub ledger: ResultLedger,
    /// Whether the report reached the mailer successfully.
    pub delivered: bool,
}

impl RunReport {
    /// Returns `true` when the run ended in the `Aborted` state.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.state == RunState::Aborted
    }

    /// Renders subject and body; the body ends with the captured `log`.
    #[must_use]
    pub fn render(&self, log: &str) -> Report {
        let mut subject = format!("Issue Generator Report {}", self.date.format("%d-%m-%Y"));
        if self.aborted() {
            subject.push_str(" (ABORTED)");
        }

        let mut body = format!("{SUMMARY_HEADER}\n\n");
        if let Some(reason) = &self.abort_reason {
            body.push_str(&format!("Run aborted: {reason}\n\n"));
        }
        body.push_str(&self.ledger.render_summary());
        body.push('\n');
        body.push_str(log);

        Report { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::IssueDefinition;
    use crate::ledger::Outcome;
    use crate::schedule::DateRule;

    fn report(state: RunState, abort_reason: Option<&str>) -> RunReport {
        RunReport {
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            state,
            abort_reason: abort_reason.map(String::from),
            ledger: ResultLedger::new(),
            delivered: false,
        }
    }

    #[test]
    fn completed_report_layout() {
        let mut run = report(RunState::Done, None);
        run.ledger.record(&IssueDefinition::new("OPS", "Patch", DateRule::PatchTuesday), Outcome::Created);

        let rendered = run.render("2024-01-09 INFO Starting\n");
        assert_eq!(rendered.subject, "Issue Generator Report 09-01-2024");
        assert!(rendered.body.starts_with(SUMMARY_HEADER));
        assert!(rendered.body.contains("CREATED: OPS - Patch\n"));
        assert!(rendered.body.ends_with("2024-01-09 INFO Starting\n"));
        assert!(!rendered.body.contains("Run aborted"));
    }

    #[test]
    fn aborted_report_names_reason() {
        let run = report(RunState::Aborted, Some("tracker returned HTTP 401"));
        let rendered = run.render("");
        assert!(rendered.subject.ends_with("(ABORTED)"));
        assert!(rendered.body.contains("Run aborted: tracker returned HTTP 401"));
        assert!(rendered.body.contains("No issues have been detected."));
    }
}

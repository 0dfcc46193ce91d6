//! Clock pinned to one date.

use chrono::NaiveDate;

use crate::ports::clock::Clock;

/// Clock that always reports the same date.
///
/// Used by `--date` and by tests to evaluate a run as of any day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_returns_the_pinned_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let clock = FixedClock(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today(), date);
    }
}

//! Calendar rules deciding when an issue definition is due.
//!
//! Evaluation is a pure function of the rule and a date, so any past or
//! future day can be checked without touching the wall clock.

mod rule;

pub use rule::{DateRule, RuleError};

use chrono::{Datelike, NaiveDate};

/// Fallback patch Tuesday when neither inspected week row yields one.
const DEFAULT_PATCH_TUESDAY: u32 = 12;

/// Returns `true` when `rule` is due on `today`.
#[must_use]
pub fn matches(rule: &DateRule, today: NaiveDate) -> bool {
    match *rule {
        DateRule::Daily => true,
        DateRule::Weekly(day) => today.weekday().number_from_monday() == day,
        DateRule::PatchTuesday => today.day() == patch_tuesday(today.year(), today.month()),
        DateRule::SaturdayAfterPatchTuesday => {
            today.day() == patch_tuesday(today.year(), today.month()) + 4
        }
        DateRule::DayOfMonth(n) => today.day() == n,
        DateRule::AnnualOnDate(date) => today == date,
        DateRule::RecurringAnnual { day, month } => today.day() == day && today.month() == month,
    }
}

/// Day of month of the patch Tuesday for `year`/`month`.
///
/// The month is laid out as Monday-first week rows with zero padding. Rows 1
/// and 2 are scanned in order and the first Tuesday that is at least 8 wins.
/// Only the lower bound is enforced.
#[must_use]
pub fn patch_tuesday(year: i32, month: u32) -> u32 {
    [1, 2]
        .into_iter()
        .map(|row| tuesday_in_row(year, month, row))
        .find(|&day| day >= 8)
        .unwrap_or(DEFAULT_PATCH_TUESDAY)
}

/// Tuesday column of week row `row` in the month grid, or 0 for padding.
fn tuesday_in_row(year: i32, month: u32, row: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let offset = first.weekday().num_days_from_monday();
    // Tuesday is column 1; day 1 sits in column `offset` of row 0.
    let cell = 7 * row + 1;
    if cell < offset || cell - offset + 1 > days_in_month(first) {
        0
    } else {
        cell - offset + 1
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (year, month) =
        if first.month() == 12 { (first.year() + 1, 1) } else { (first.year(), first.month() + 1) };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

//! Date rule type and its parsing from definition documents.

use std::fmt;

use chrono::NaiveDate;
use serde_yaml::Value;
use thiserror::Error;

/// When an issue definition is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// Every day.
    Daily,
    /// Once a week on the given ISO weekday (1 = Monday, 7 = Sunday).
    Weekly(u32),
    /// The patch Tuesday of every month.
    PatchTuesday,
    /// Four days after the patch Tuesday of every month.
    SaturdayAfterPatchTuesday,
    /// The given day of every month.
    DayOfMonth(u32),
    /// A single calendar date.
    AnnualOnDate(NaiveDate),
    /// The given day and month of every year.
    RecurringAnnual {
        /// Day of month, 1-31.
        day: u32,
        /// Month, 1-12.
        month: u32,
    },
}

/// Why a date rule could not be recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The `date` key is missing or empty.
    #[error("no date rule given")]
    Missing,
    /// A `weekly` rule without a usable `day-of-week`.
    #[error("weekly rule needs day-of-week between 1 and 7, got {0}")]
    InvalidWeekday(String),
    /// A day-of-month rule outside 1-31.
    #[error("day of month must be between 1 and 31, got {0}")]
    InvalidDayOfMonth(i64),
    /// A string that matches no rule keyword or date pattern.
    #[error("unrecognized date rule {0:?}")]
    Unrecognized(String),
    /// A date string with the right shape that names no real date.
    #[error("{0:?} is not a valid calendar date")]
    InvalidDate(String),
}

impl DateRule {
    /// Builds a rule from the raw `date` and `day-of-week` values of a definition.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] when the value matches no known rule.
    pub fn from_raw(date: &Value, day_of_week: &Value) -> Result<Self, RuleError> {
        match date {
            Value::Null => Err(RuleError::Missing),
            Value::Number(n) => {
                let n = n.as_i64().ok_or_else(|| RuleError::Unrecognized(n.to_string()))?;
                match u32::try_from(n) {
                    Ok(day @ 1..=31) => Ok(Self::DayOfMonth(day)),
                    _ => Err(RuleError::InvalidDayOfMonth(n)),
                }
            }
            Value::String(s) => Self::from_keyword(s, day_of_week),
            other => Err(RuleError::Unrecognized(format!("{other:?}"))),
        }
    }

    fn from_keyword(raw: &str, day_of_week: &Value) -> Result<Self, RuleError> {
        match raw.trim() {
            "" => Err(RuleError::Missing),
            "daily" => Ok(Self::Daily),
            "weekly" => match day_of_week.as_u64().and_then(|d| u32::try_from(d).ok()) {
                Some(d @ 1..=7) => Ok(Self::Weekly(d)),
                _ => Err(RuleError::InvalidWeekday(describe(day_of_week))),
            },
            "patch-tuesday" => Ok(Self::PatchTuesday),
            "saturday-after-patch-tuesday" => Ok(Self::SaturdayAfterPatchTuesday),
            other if other.len() == 10 => Self::parse_annual(other),
            other => Self::parse_recurring(other),
        }
    }

    /// Parses a one-shot `DD-MM-YYYY` date.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] when the shape is wrong or the date does not exist.
    pub fn parse_annual(raw: &str) -> Result<Self, RuleError> {
        let bytes = raw.as_bytes();
        if bytes.len() != 10
            || bytes[5] != b'-'
            || !valid_day_month(&bytes[..5])
            || !bytes[6..].iter().all(u8::is_ascii_digit)
        {
            return Err(RuleError::Unrecognized(raw.to_string()));
        }
        let (day, month) = day_month(bytes);
        let year = digits(&bytes[6..]);
        let year = i32::try_from(year).map_err(|_| RuleError::InvalidDate(raw.to_string()))?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::AnnualOnDate)
            .ok_or_else(|| RuleError::InvalidDate(raw.to_string()))
    }

    /// Parses a recurring `DD-MM` date.
    ///
    /// 29 February is accepted and only matches in leap years.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] when the shape is wrong or no year has that date.
    pub fn parse_recurring(raw: &str) -> Result<Self, RuleError> {
        let bytes = raw.as_bytes();
        if bytes.len() != 5 || !valid_day_month(bytes) {
            return Err(RuleError::Unrecognized(raw.to_string()));
        }
        let (day, month) = day_month(bytes);
        // 2000 is a leap year, so this accepts every day that occurs in some year.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(RuleError::InvalidDate(raw.to_string()));
        }
        Ok(Self::RecurringAnnual { day, month })
    }
}

/// Checks the `DD-MM` prefix: day 00-31, dash, month 00-12.
fn valid_day_month(bytes: &[u8]) -> bool {
    let day_ok = match bytes[0] {
        b'0'..=b'2' => bytes[1].is_ascii_digit(),
        b'3' => matches!(bytes[1], b'0' | b'1'),
        _ => false,
    };
    let month_ok = match bytes[3] {
        b'0' => bytes[4].is_ascii_digit(),
        b'1' => matches!(bytes[4], b'0'..=b'2'),
        _ => false,
    };
    day_ok && bytes[2] == b'-' && month_ok
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "nothing".to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

fn day_month(bytes: &[u8]) -> (u32, u32) {
    (digits(&bytes[0..2]), digits(&bytes[3..5]))
}

fn digits(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl fmt::Display for DateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly(d) => write!(f, "weekly on day {d}"),
            Self::PatchTuesday => write!(f, "patch-tuesday"),
            Self::SaturdayAfterPatchTuesday => write!(f, "saturday-after-patch-tuesday"),
            Self::DayOfMonth(n) => write!(f, "monthly on day {n}"),
            Self::AnnualOnDate(date) => write!(f, "once on {}", date.format("%d-%m-%Y")),
            Self::RecurringAnnual { day, month } => write!(f, "yearly on {day:02}-{month:02}"),
        }
    }
}

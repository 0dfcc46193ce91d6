//! Live clock using the system's local date.

use chrono::{Local, NaiveDate};

use crate::ports::clock::Clock;

/// Live clock that returns the real local date.
pub struct LiveClock;

impl Clock for LiveClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

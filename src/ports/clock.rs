//! Clock port for obtaining the current calendar date.

use chrono::NaiveDate;

/// Provides "today".
///
/// Abstracting date access lets a run be evaluated as of any day by
/// substituting a fixed clock in tests or from the command line.
pub trait Clock: Send + Sync {
    /// Returns the current local calendar date.
    fn today(&self) -> NaiveDate;
}

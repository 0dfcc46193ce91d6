//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the run core and an external
//! system (time, filesystem, issue tracker, mail). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod tracker;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use mailer::{MailError, MailFuture, Mailer, Report};
pub use tracker::{
    CreatedIssue, FieldSample, ProjectRecord, Tracker, TrackerError, TrackerFuture,
};

//! Adapters implementing the port traits.
//!
//! `live` talks to the real clock, disk, tracker and SMTP server. The others
//! stand in for them: a fixed clock for evaluating arbitrary dates, a
//! dry-run tracker and console mailer for rehearsal runs, and in-memory
//! fakes for tests.

pub mod console;
pub mod dry_run;
pub mod fixed;
pub mod live;
pub mod memory;

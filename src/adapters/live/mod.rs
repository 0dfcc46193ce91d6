//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod tracker;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use mailer::SmtpMailer;
pub use tracker::LiveTracker;

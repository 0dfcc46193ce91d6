//! Mailer port for delivering the run report.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future type alias used by [`Mailer`] to keep the trait dyn-compatible.
pub type MailFuture<'a> = Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;

/// Errors that can occur while delivering a report.
#[derive(Debug, Error)]
pub enum MailError {
    /// Sender or recipient addresses could not be parsed, or none were given.
    #[error("invalid mail address configuration: {0}")]
    Address(String),

    /// Building or sending the message over SMTP failed.
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    /// Writing the report to the console failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered report ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Message subject.
    pub subject: String,
    /// Plain-text message body.
    pub body: String,
}

/// Delivers the run report.
pub trait Mailer: Send + Sync {
    /// Sends the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be delivered.
    fn send<'a>(&'a self, report: &'a Report) -> MailFuture<'a>;

    /// Human-readable name for this channel (e.g. `"smtp"`, `"console"`).
    fn channel_name(&self) -> &str;
}

impl<T: Mailer + ?Sized> Mailer for std::sync::Arc<T> {
    fn send<'a>(&'a self, report: &'a Report) -> MailFuture<'a> {
        (**self).send(report)
    }

    fn channel_name(&self) -> &str {
        (**self).channel_name()
    }
}

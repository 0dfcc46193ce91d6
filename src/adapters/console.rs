//! Console mailer printing the report to stdout.

use std::io::Write;

use crate::ports::mailer::{MailError, MailFuture, Mailer, Report};

/// Writes the report to stdout instead of mailing it.
///
/// Used when no SMTP section is configured and for dry runs.
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    fn send<'a>(&'a self, report: &'a Report) -> MailFuture<'a> {
        Box::pin(async move {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "Subject: {}\n", report.subject).map_err(MailError::Io)?;
            writeln!(out, "{}", report.body).map_err(MailError::Io)?;
            Ok(())
        })
    }

    fn channel_name(&self) -> &str {
        "console"
    }
}

//! SMTP mailer via `lettre`.
//!
//! Delivers the run report as a plain-text email through the configured
//! SMTP server, over implicit TLS, STARTTLS or (for local relays) plain TCP.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::{SmtpConfig, SmtpSecurity};
use crate::ports::mailer::{MailError, MailFuture, Mailer, Report};

/// Sends reports as emails via SMTP.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Builds a mailer from SMTP configuration. No connection is opened yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an address cannot be parsed, no recipient is
    /// given, or the TLS transport cannot be set up.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .sender
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;

        let to = config
            .recipients
            .iter()
            .map(|addr| {
                addr.parse()
                    .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))
            })
            .collect::<Result<Vec<Mailbox>, _>>()?;

        if to.is_empty() {
            return Err(MailError::Address("at least one recipient is required".to_string()));
        }

        let mut builder = match config.security {
            SmtpSecurity::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                    .map_err(|e| MailError::Smtp(e.to_string()))?
            }
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server),
        }
        .port(config.port)
        .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let Some(username) = &config.username {
            let password = config.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(Self { transport: builder.build(), from, to })
    }
}

impl Mailer for SmtpMailer {
    fn send<'a>(&'a self, report: &'a Report) -> MailFuture<'a> {
        Box::pin(async move {
            let mut message = Message::builder().from(self.from.clone());
            for recipient in &self.to {
                message = message.to(recipient.clone());
            }
            let email = message
                .subject(&report.subject)
                .header(ContentType::TEXT_PLAIN)
                .body(report.body.clone())
                .map_err(|e| MailError::Smtp(e.to_string()))?;

            self.transport.send(email).await.map_err(|e| MailError::Smtp(e.to_string()))?;

            info!(
                channel = "smtp",
                subject = %report.subject,
                recipients = self.to.len(),
                "report delivered"
            );
            Ok(())
        })
    }

    fn channel_name(&self) -> &str {
        "smtp"
    }
}

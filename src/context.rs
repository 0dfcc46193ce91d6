//! Service context bundling all port trait objects.

use crate::adapters::console::ConsoleMailer;
use crate::adapters::dry_run::DryRunTracker;
use crate::adapters::fixed::FixedClock;
use crate::adapters::live::{LiveClock, LiveFileSystem, LiveTracker, SmtpMailer};
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::mailer::Mailer;
use crate::ports::tracker::Tracker;

use chrono::NaiveDate;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations.
pub struct ServiceContext {
    /// Clock for obtaining today's date.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading definitions.
    pub fs: Box<dyn FileSystem>,
    /// Issue tracker.
    pub tracker: Box<dyn Tracker>,
    /// Report delivery.
    pub mailer: Box<dyn Mailer>,
}

/// Switches applied when building a live context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveOptions {
    /// Evaluate as of this date instead of the local date.
    pub date: Option<NaiveDate>,
    /// Look up projects and fields but never create issues or send mail.
    pub dry_run: bool,
}

impl ServiceContext {
    /// Creates a context with live adapters for the configured tracker and
    /// SMTP server.
    ///
    /// Without an `[smtp]` section, or in a dry run, the report goes to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client or SMTP transport cannot
    /// be built.
    pub fn live(config: &Config, options: LiveOptions) -> Result<Self, String> {
        let clock: Box<dyn Clock> = match options.date {
            Some(date) => Box::new(FixedClock(date)),
            None => Box::new(LiveClock),
        };

        let live_tracker = LiveTracker::new(&config.tracker)
            .map_err(|e| format!("Failed to build tracker client: {e}"))?;
        let tracker: Box<dyn Tracker> = if options.dry_run {
            Box::new(DryRunTracker::new(Box::new(live_tracker)))
        } else {
            Box::new(live_tracker)
        };

        let mailer: Box<dyn Mailer> = match &config.smtp {
            Some(smtp) if !options.dry_run => Box::new(
                SmtpMailer::from_config(smtp)
                    .map_err(|e| format!("Failed to configure SMTP: {e}"))?,
            ),
            _ => Box::new(ConsoleMailer),
        };

        Ok(Self { clock, fs: Box::new(LiveFileSystem), tracker, mailer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(smtp: bool) -> Config {
        let mut text = String::from("[tracker]\nurl = \"http://localhost:1\"\ntoken = \"t\"\n");
        if smtp {
            text.push_str(
                "[smtp]\nserver = \"localhost\"\nsecurity = \"none\"\nport = 2525\nsender = \"a@example.com\"\nrecipients = [\"b@example.com\"]\n",
            );
        }
        Config::parse(&text).unwrap()
    }

    #[test]
    fn date_override_pins_the_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let ctx =
            ServiceContext::live(&config(false), LiveOptions { date: Some(date), dry_run: false })
                .unwrap();
        assert_eq!(ctx.clock.today(), date);
    }

    #[test]
    fn smtp_config_selects_smtp_mailer() {
        let ctx = ServiceContext::live(&config(true), LiveOptions::default()).unwrap();
        assert_eq!(ctx.mailer.channel_name(), "smtp");
    }

    #[test]
    fn dry_run_and_missing_smtp_print_to_console() {
        let ctx = ServiceContext::live(&config(false), LiveOptions::default()).unwrap();
        assert_eq!(ctx.mailer.channel_name(), "console");
        let ctx =
            ServiceContext::live(&config(true), LiveOptions { date: None, dry_run: true }).unwrap();
        assert_eq!(ctx.mailer.channel_name(), "console");
    }
}

//! Run configuration: tracker endpoint and credentials, report delivery.
//!
//! Loaded from a TOML file. Values can be overridden from the environment
//! (a `.env` file is honoured) so secrets need not live in the file:
//!
//! ```toml
//! [tracker]
//! url = "https://youtrack.example.com/"
//! token = "perm:..."
//! timeout_secs = 30
//!
//! [smtp]
//! server = "smtp.example.com"
//! port = 465
//! security = "implicit"
//! username = "reports@example.com"
//! sender = "Issue Generator <reports@example.com>"
//! recipients = ["ops@example.com"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the tracker URL.
pub const ENV_TRACKER_URL: &str = "ISSUEGEN_TRACKER_URL";
/// Environment variable overriding the tracker token.
pub const ENV_TRACKER_TOKEN: &str = "ISSUEGEN_TRACKER_TOKEN";
/// Environment variable overriding the SMTP username.
pub const ENV_SMTP_USERNAME: &str = "ISSUEGEN_SMTP_USERNAME";
/// Environment variable overriding the SMTP password.
pub const ENV_SMTP_PASSWORD: &str = "ISSUEGEN_SMTP_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_PORT: u16 = 465;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is missing or empty.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Issue tracker connection.
    pub tracker: TrackerConfig,
    /// Report delivery; without it the report is printed to stdout.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Issue tracker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker, e.g. `https://youtrack.example.com/`.
    #[serde(default)]
    pub url: String,
    /// Permanent bearer token.
    #[serde(default)]
    pub token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, usually port 465).
    #[default]
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    Starttls,
    /// No encryption. Only for local relays.
    None,
}

/// Report delivery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host name.
    pub server: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Connection security.
    #[serde(default)]
    pub security: SmtpSecurity,
    /// Login user name; unauthenticated when absent.
    #[serde(default)]
    pub username: Option<String>,
    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address.
    pub sender: String,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

impl Config {
    /// Loads the file at `path`, applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or required
    /// values are missing after overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replaces values with those returned by `lookup` for the override keys.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_TRACKER_URL) {
            self.tracker.url = url;
        }
        if let Some(token) = lookup(ENV_TRACKER_TOKEN) {
            self.tracker.token = token;
        }
        if let Some(smtp) = self.smtp.as_mut() {
            if let Some(username) = lookup(ENV_SMTP_USERNAME) {
                smtp.username = Some(username);
            }
            if let Some(password) = lookup(ENV_SMTP_PASSWORD) {
                smtp.password = Some(password);
            }
        }
    }

    /// Checks that required values are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first missing value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.url.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "tracker.url is required (or set {ENV_TRACKER_URL})"
            )));
        }
        if self.tracker.token.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "tracker.token is required (or set {ENV_TRACKER_TOKEN})"
            )));
        }
        if let Some(smtp) = &self.smtp {
            if smtp.recipients.is_empty() {
                return Err(ConfigError::Invalid("smtp.recipients must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[tracker]
url = "https://yt.example.com/"
token = "perm:file"

[smtp]
server = "smtp.example.com"
security = "starttls"
port = 587
sender = "reports@example.com"
recipients = ["ops@example.com", "sec@example.com"]
"#;

    #[test]
    fn parses_full_config_with_defaults() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.tracker.url, "https://yt.example.com/");
        assert_eq!(config.tracker.timeout_secs, 30);
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.security, SmtpSecurity::Starttls);
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.recipients.len(), 2);
        assert!(smtp.username.is_none());
    }

    #[test]
    fn smtp_section_is_optional() {
        let config = Config::parse("[tracker]\nurl = \"http://yt\"\ntoken = \"t\"\n").unwrap();
        assert!(config.smtp.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn smtp_defaults_to_implicit_tls_on_465() {
        let config = Config::parse(
            "[tracker]\nurl = \"u\"\n[smtp]\nserver = \"s\"\nsender = \"a@b.c\"\nrecipients = [\"d@e.f\"]\n",
        )
        .unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 465);
        assert_eq!(smtp.security, SmtpSecurity::Implicit);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::parse(FULL).unwrap();
        config.apply_overrides(|key| match key {
            ENV_TRACKER_TOKEN => Some("perm:env".to_string()),
            ENV_SMTP_PASSWORD => Some("hunter2".to_string()),
            _ => None,
        });
        assert_eq!(config.tracker.token, "perm:env");
        assert_eq!(config.tracker.url, "https://yt.example.com/");
        assert_eq!(config.smtp.unwrap().password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn missing_token_is_invalid() {
        let config = Config::parse("[tracker]\nurl = \"http://yt\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tracker.token"));
    }

    #[test]
    fn empty_recipients_are_invalid() {
        let config = Config::parse(
            "[tracker]\nurl = \"u\"\ntoken = \"t\"\n[smtp]\nserver = \"s\"\nsender = \"a@b.c\"\nrecipients = []\n",
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load(Path::new("/nonexistent/issuegen.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(Config::parse("[tracker"), Err(ConfigError::Parse(_))));
    }
}

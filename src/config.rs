//! Configuration file management for certwatch.
//!
//! This module handles loading and validating the TOML settings file that
//! drives a run: the monitored sites, the alert thresholds, the email and
//! webhook notification channels, logging, and the display timezone.
//!
//! # Example Configuration File
//!
//! ```toml
//! [[sites]]
//! url = "example.com"
//! port = 443
//! name = "Example"
//!
//! [alert]
//! warning_days = 30
//! critical_days = 7
//!
//! [email]
//! enabled = false
//!
//! [webhook]
//! enabled = true
//! url = "https://example.com/webhooks/CHANGE_ME"
//! notify_on = ["WARNING", "CRITICAL", "ERROR"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::{Status, Thresholds};

/// Placeholder webhook URL shipped by [`Settings::example_toml`].
///
/// A webhook configured with this exact value is treated as "not configured"
/// and the dispatcher silently skips it.
pub const WEBHOOK_URL_PLACEHOLDER: &str = "https://example.com/webhooks/CHANGE_ME";

/// A monitored endpoint.
///
/// `port` defaults to 443 when absent or zero, and `name` falls back to
/// `url` when absent or empty. Defaulting is applied by the scanner and is
/// visible in every result produced for this site.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Site {
    /// Hostname to probe (also used as the SNI server name)
    pub url: String,
    /// TCP port of the TLS service
    #[serde(default)]
    pub port: Option<u16>,
    /// Display label used in reports and notifications
    #[serde(default)]
    pub name: Option<String>,
}

impl Site {
    /// Port to connect to, with 443 substituted for an absent or zero value.
    pub fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) if port != 0 => port,
            _ => 443,
        }
    }

    /// Display label, falling back to the hostname when unset or empty.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.is_empty() => name,
            _ => &self.url,
        }
    }
}

/// SMTP transport settings.
///
/// `use_ssl` selects implicit TLS (the connection is encrypted before any
/// SMTP traffic), `use_tls` selects mandatory STARTTLS. With neither set the
/// client connects in plaintext and upgrades opportunistically when the
/// server offers STARTTLS. Credentials are attached only when both
/// `username` and `password` are non-empty.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub use_ssl: bool,
    #[serde(default)]
    pub use_tls: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        SmtpSettings {
            host: String::new(),
            port: default_smtp_port(),
            use_ssl: false,
            use_tls: false,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Email notification settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings {
            enabled: false,
            smtp: SmtpSettings::default(),
            from: String::new(),
            to: Vec::new(),
            subject: default_subject(),
        }
    }
}

/// Webhook notification settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct WebhookSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    /// Statuses to notify on. An empty list means notify on all statuses.
    #[serde(default)]
    pub notify_on: Vec<Status>,
}

impl WebhookSettings {
    /// Whether a result with `status` passes the notification policy.
    ///
    /// An empty `notify_on` list is the notify-all policy, not notify-none.
    pub fn should_notify(&self, status: Status) -> bool {
        self.notify_on.is_empty() || self.notify_on.contains(&status)
    }
}

/// Logging settings: a `tracing` filter directive and an optional log file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append-mode log file; events go to stderr when unset.
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Display settings for human-facing timestamps.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplaySettings {
    /// IANA timezone name used to render all displayed timestamps.
    /// An unknown name falls back to a fixed UTC+9 offset.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            timezone: default_timezone(),
        }
    }
}

/// Root settings structure for a certwatch run.
///
/// Every section is optional in the file; missing sections take their
/// documented defaults so a minimal configuration only needs `[[sites]]`
/// entries.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub alert: Thresholds,
    #[serde(default)]
    pub email: EmailSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Successfully parsed and validated settings
    /// * `Err(ConfigError::Io)` - File could not be read
    /// * `Err(ConfigError::Parse)` - File contains invalid TOML
    /// * `Err(ConfigError::Validation)` - Settings are inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Self::from_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a TOML file without validating them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(settings)
    }

    /// Checks cross-field consistency.
    ///
    /// Rejects negative thresholds, a warning threshold below the critical
    /// one (the classification boundaries would invert), and an enabled
    /// webhook whose URL is set but unparseable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert.warning_days < 0 || self.alert.critical_days < 0 {
            return Err(ConfigError::Validation(
                "alert thresholds must be non-negative".to_string(),
            ));
        }
        if self.alert.warning_days < self.alert.critical_days {
            return Err(ConfigError::Validation(format!(
                "warning_days ({}) must not be below critical_days ({})",
                self.alert.warning_days, self.alert.critical_days
            )));
        }
        if self.webhook.enabled
            && !self.webhook.url.is_empty()
            && self.webhook.url != WEBHOOK_URL_PLACEHOLDER
        {
            Url::parse(&self.webhook.url)
                .map_err(|e| ConfigError::Validation(format!("invalid webhook URL: {}", e)))?;
        }
        Ok(())
    }

    /// Generates an example configuration file in TOML format.
    ///
    /// Creates a sample configuration with all available options set to
    /// example values. Useful for bootstrapping a new configuration file.
    pub fn example_toml() -> String {
        let example = Settings {
            sites: vec![
                Site {
                    url: "example.com".to_string(),
                    port: Some(443),
                    name: Some("Example".to_string()),
                },
                Site {
                    url: "internal.example.com".to_string(),
                    port: Some(8443),
                    name: Some("Internal portal".to_string()),
                },
            ],
            alert: Thresholds {
                warning_days: 30,
                critical_days: 7,
            },
            email: EmailSettings {
                enabled: false,
                smtp: SmtpSettings {
                    host: "smtp.example.com".to_string(),
                    port: 587,
                    use_ssl: false,
                    use_tls: true,
                    username: "alerts@example.com".to_string(),
                    password: "secret".to_string(),
                },
                from: "alerts@example.com".to_string(),
                to: vec!["ops@example.com".to_string()],
                subject: default_subject(),
            },
            webhook: WebhookSettings {
                enabled: false,
                url: WEBHOOK_URL_PLACEHOLDER.to_string(),
                notify_on: vec![Status::Warning, Status::Critical, Status::Error],
            },
            logging: LoggingSettings::default(),
            display: DisplaySettings::default(),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "TLS certificate expiry report".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (inconsistent thresholds, invalid values, etc.)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

//! Notification dispatch over a scan batch.
//!
//! Two independent sinks: an SMTP email carrying both report renderings,
//! and a webhook posting one message card per notifiable result. Each sink
//! filters or skips on its own; a failure in one never blocks the other.
//!
//! # Submodules
//!
//! - `email` - SMTP dispatcher (implicit TLS, STARTTLS, or opportunistic)
//! - `webhook` - JSON message-card dispatcher

pub mod email;
pub mod webhook;

use std::fmt;

/// Error type for a failed notification dispatch.
#[derive(Debug)]
pub enum NotifyError {
    /// A configured mail address could not be parsed
    InvalidAddress {
        /// Parser diagnostic
        details: String,
    },

    /// The MIME message could not be assembled
    Message {
        /// Builder diagnostic
        details: String,
    },

    /// SMTP transport or protocol failure (dial, handshake, auth,
    /// envelope, data)
    Smtp {
        /// Transport diagnostic
        details: String,
    },

    /// Webhook HTTP transport failure
    Http {
        /// Transport diagnostic
        details: String,
    },
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress { details } => {
                write!(f, "invalid mail address: {}", details)
            }
            Self::Message { details } => {
                write!(f, "failed to build message: {}", details)
            }
            Self::Smtp { details } => {
                write!(f, "SMTP delivery failed: {}", details)
            }
            Self::Http { details } => {
                write!(f, "webhook request failed: {}", details)
            }
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(e: lettre::address::AddressError) -> Self {
        Self::InvalidAddress {
            details: e.to_string(),
        }
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(e: lettre::error::Error) -> Self {
        Self::Message {
            details: e.to_string(),
        }
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        Self::Smtp {
            details: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http {
            details: e.to_string(),
        }
    }
}

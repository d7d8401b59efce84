//! Error types for certificate probing.
//!
//! This module defines the failure taxonomy of a single endpoint probe.
//! Probe failures never abort a scan; the scanner converts them into
//! `ERROR` results for the affected site.

use std::fmt;
use std::io;

/// Error type for a failed certificate probe.
///
/// Each variant maps to one stage of the probe: address resolution,
/// TCP connect, TLS handshake, or certificate extraction.
#[derive(Debug)]
pub enum ProbeError {
    /// DNS resolution failed for the given hostname
    DnsResolution {
        /// The hostname that failed to resolve
        hostname: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TCP connection failed to the target address
    ConnectionFailed {
        /// The address (host:port) that connection failed to
        address: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// TLS handshake failed, including certificate rejection by the
    /// transport layer
    HandshakeFailed {
        /// Details about why the handshake failed
        details: String,
    },

    /// The peer presented no certificate, or the leaf could not be read
    CertificateError {
        /// Description of what went wrong
        reason: String,
    },

    /// OpenSSL error occurred
    OpenSslError {
        /// The underlying OpenSSL error
        details: String,
    },

    /// Generic I/O error
    IoError {
        /// The underlying I/O error
        source: io::Error,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DnsResolution { hostname, .. } => {
                write!(f, "failed to resolve hostname: {}", hostname)
            }
            Self::ConnectionFailed { address, .. } => {
                write!(f, "connection failed to: {}", address)
            }
            Self::HandshakeFailed { details } => {
                write!(f, "TLS handshake failed: {}", details)
            }
            Self::CertificateError { reason } => {
                write!(f, "certificate error: {}", reason)
            }
            Self::OpenSslError { details } => {
                write!(f, "OpenSSL error: {}", details)
            }
            Self::IoError { source } => {
                write!(f, "I/O error: {}", source)
            }
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DnsResolution { source, .. } => Some(source),
            Self::ConnectionFailed { source, .. } => Some(source),
            Self::IoError { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        Self::IoError { source: e }
    }
}

impl From<openssl::error::ErrorStack> for ProbeError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::OpenSslError {
            details: e.to_string(),
        }
    }
}

impl<S: std::fmt::Debug> From<openssl::ssl::HandshakeError<S>> for ProbeError {
    fn from(e: openssl::ssl::HandshakeError<S>) -> Self {
        Self::HandshakeFailed {
            details: format!("{}", e),
        }
    }
}

//! Core certificate auditing: probe an endpoint, classify the leaf
//! certificate by remaining validity, and collect one result per
//! configured site.

use chrono::{DateTime, Utc};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::nid::Nid;
use openssl::ssl::{SslConnector, SslMethod};
use openssl::x509::{X509NameRef, X509};
use serde::{Deserialize, Serialize};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use strum_macros::Display;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod report;
pub mod timezone;

use config::Site;
use error::ProbeError;

/// Connection budget for a single probe, in seconds.
static PROBE_TIMEOUT: u64 = 10;

const SECONDS_PER_DAY: i64 = 86_400;

/// Classification of a single site's certificate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Error,
}

impl Status {
    /// Severity color (integer RGB) used on webhook message cards.
    ///
    /// The mapping is total over the closed status set; gray (`0x808080`)
    /// is the documented fallback for anything outside it.
    pub fn color(self) -> u32 {
        match self {
            Status::Ok => 0x00FF00,
            Status::Warning => 0xFFA500,
            Status::Critical => 0xFF0000,
            Status::Error => 0x8B0000,
        }
    }

    /// Lower-cased status name, used as a CSS class in the HTML report.
    pub fn css_class(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Critical => "critical",
            Status::Error => "error",
        }
    }
}

/// Day-count thresholds driving classification.
///
/// `warning_days` is expected to be at or above `critical_days`;
/// [`config::Settings::validate`] rejects the inverted ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
    #[serde(default = "default_critical_days")]
    pub critical_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            warning_days: default_warning_days(),
            critical_days: default_critical_days(),
        }
    }
}

fn default_warning_days() -> i64 {
    30
}

fn default_critical_days() -> i64 {
    7
}

impl Thresholds {
    /// Maps a remaining-day count to a status.
    ///
    /// Boundary values belong to the more severe bucket: a count equal to
    /// `critical_days` is CRITICAL and one equal to `warning_days` is
    /// WARNING. Negative counts (already expired) are CRITICAL.
    pub fn classify(&self, days_remaining: i64) -> Status {
        if days_remaining < 0 {
            Status::Critical
        } else if days_remaining <= self.critical_days {
            Status::Critical
        } else if days_remaining <= self.warning_days {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

/// Whole days between `now` and `not_after`, rounded toward negative
/// infinity. A certificate that expired twelve hours ago is on day `-1`,
/// not day zero.
pub fn days_remaining(now: DateTime<Utc>, not_after: DateTime<Utc>) -> i64 {
    (not_after - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Fields read from a peer's leaf certificate.
#[derive(Debug, Clone)]
pub struct PeerCertificate {
    pub issuer: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Certificate details carried by a successful check.
#[derive(Debug, Clone)]
pub struct CertDetails {
    pub issuer: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub days_remaining: i64,
}

/// How a single check ended: a readable certificate or a failure message.
#[derive(Debug, Clone)]
pub enum Outcome {
    Checked(CertDetails),
    Failed { message: String },
}

/// One site's check result. Produced once per site per run, immutable
/// afterward.
#[derive(Debug, Clone)]
pub struct CertReport {
    pub site_name: String,
    pub url: String,
    pub port: u16,
    pub status: Status,
    pub outcome: Outcome,
}

impl CertReport {
    /// Result for a probed certificate, classified by the caller.
    pub fn checked(
        site_name: String,
        url: String,
        port: u16,
        status: Status,
        details: CertDetails,
    ) -> Self {
        CertReport {
            site_name,
            url,
            port,
            status,
            outcome: Outcome::Checked(details),
        }
    }

    /// Result for a failed probe. The status is always [`Status::Error`].
    pub fn failed(site_name: String, url: String, port: u16, message: String) -> Self {
        CertReport {
            site_name,
            url,
            port,
            status: Status::Error,
            outcome: Outcome::Failed { message },
        }
    }

    /// Certificate details, when the probe succeeded.
    pub fn details(&self) -> Option<&CertDetails> {
        match &self.outcome {
            Outcome::Checked(details) => Some(details),
            Outcome::Failed { .. } => None,
        }
    }

    /// Failure message, when the probe failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Checked(_) => None,
            Outcome::Failed { message } => Some(message),
        }
    }
}

/// Opens a TLS connection to `host:port` and reads the peer's leaf
/// certificate.
///
/// The server name indicator is set to `host` and the platform trust
/// store applies, so a certificate the transport layer rejects (expired
/// chain, name mismatch, unknown issuer) surfaces as a handshake failure.
/// The connection is closed when the stream drops, regardless of outcome.
pub fn probe_endpoint(host: &str, port: u16) -> Result<PeerCertificate, ProbeError> {
    let connector = SslConnector::builder(SslMethod::tls())?.build();

    let address = format!("{}:{}", host, port);
    let mut resolved = address
        .to_socket_addrs()
        .map_err(|e| ProbeError::DnsResolution {
            hostname: host.to_string(),
            source: e,
        })?;
    let socket_addr = resolved.next().ok_or_else(|| ProbeError::DnsResolution {
        hostname: host.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved"),
    })?;

    let timeout = Duration::from_secs(PROBE_TIMEOUT);
    let tcp_stream = TcpStream::connect_timeout(&socket_addr, timeout).map_err(|e| {
        ProbeError::ConnectionFailed {
            address: address.clone(),
            source: e,
        }
    })?;
    tcp_stream.set_read_timeout(Some(timeout))?;
    tcp_stream.set_write_timeout(Some(timeout))?;

    let stream = connector.connect(host, tcp_stream)?;

    let certificate =
        stream
            .ssl()
            .peer_certificate()
            .ok_or_else(|| ProbeError::CertificateError {
                reason: "peer presented no certificate".to_string(),
            })?;

    read_certificate(&certificate)
}

fn read_certificate(cert: &X509) -> Result<PeerCertificate, ProbeError> {
    Ok(PeerCertificate {
        issuer: issuer_display(cert.issuer_name()),
        subject: first_entry(cert.subject_name(), Nid::COMMONNAME).unwrap_or_default(),
        not_before: asn1_to_datetime(cert.not_before())?,
        not_after: asn1_to_datetime(cert.not_after())?,
    })
}

/// Issuer label: organization names joined with ", ", falling back to the
/// issuer common name, falling back to the literal "Unknown".
fn issuer_display(name: &X509NameRef) -> String {
    let organizations: Vec<String> = name
        .entries_by_nid(Nid::ORGANIZATIONNAME)
        .filter_map(|entry| entry.data().as_utf8().ok())
        .map(|s| s.to_string())
        .collect();

    let label = if organizations.is_empty() {
        first_entry(name, Nid::COMMONNAME).unwrap_or_default()
    } else {
        organizations.join(", ")
    };

    if label.is_empty() {
        "Unknown".to_string()
    } else {
        label
    }
}

fn first_entry(name: &X509NameRef, nid: Nid) -> Option<String> {
    name.entries_by_nid(nid)
        .next()
        .and_then(|entry| entry.data().as_utf8().ok())
        .map(|s| s.to_string())
}

/// Converts an ASN.1 time to a UTC instant by diffing against the Unix
/// epoch.
fn asn1_to_datetime(time: &Asn1TimeRef) -> Result<DateTime<Utc>, ProbeError> {
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(time)?;
    let seconds = i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs);
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| ProbeError::CertificateError {
        reason: "certificate validity time out of range".to_string(),
    })
}

/// Checks every configured site in declaration order.
///
/// Failures are isolated per site: the returned batch always has one
/// entry per input site, in input order, even when every probe fails.
pub fn scan_sites(sites: &[Site], thresholds: &Thresholds) -> Vec<CertReport> {
    info!(sites = sites.len(), "starting certificate scan");
    let reports = sites
        .iter()
        .map(|site| check_site(site, thresholds))
        .collect();
    info!("certificate scan finished");
    reports
}

/// Probes one site and classifies the outcome.
pub fn check_site(site: &Site, thresholds: &Thresholds) -> CertReport {
    let port = site.effective_port();
    let name = site.display_name();
    info!(site = name, url = %site.url, port, "checking certificate");

    match probe_endpoint(&site.url, port) {
        Ok(peer) => {
            let days = days_remaining(Utc::now(), peer.not_after);
            let status = thresholds.classify(days);
            CertReport::checked(
                name.to_string(),
                site.url.clone(),
                port,
                status,
                CertDetails {
                    issuer: peer.issuer,
                    subject: peer.subject,
                    not_before: peer.not_before,
                    not_after: peer.not_after,
                    days_remaining: days,
                },
            )
        }
        Err(err) => {
            warn!(site = name, url = %site.url, port, error = %err, "certificate check failed");
            CertReport::failed(
                name.to_string(),
                site.url.clone(),
                port,
                format!("failed to retrieve certificate: {}", err),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn thresholds() -> Thresholds {
        Thresholds {
            warning_days: 30,
            critical_days: 7,
        }
    }

    #[test]
    fn test_classification_scenarios() {
        let t = thresholds();
        assert_eq!(t.classify(60), Status::Ok);
        assert_eq!(t.classify(20), Status::Warning);
        assert_eq!(t.classify(5), Status::Critical);
        assert_eq!(t.classify(-1), Status::Critical);
    }

    #[test]
    fn test_boundaries_belong_to_the_severe_bucket() {
        let t = thresholds();
        assert_eq!(t.classify(t.critical_days), Status::Critical);
        assert_eq!(t.classify(t.critical_days + 1), Status::Warning);
        assert_eq!(t.classify(t.warning_days), Status::Warning);
        assert_eq!(t.classify(t.warning_days + 1), Status::Ok);
        assert_eq!(t.classify(0), Status::Critical);
    }

    #[test]
    fn test_classification_is_monotonic() {
        fn severity(status: Status) -> u8 {
            match status {
                Status::Ok => 0,
                Status::Warning => 1,
                Status::Critical => 2,
                Status::Error => 3,
            }
        }

        let t = thresholds();
        let mut previous = severity(t.classify(-10));
        for days in -9..=40 {
            let current = severity(t.classify(days));
            assert!(
                current <= previous,
                "severity increased from day {} to {}",
                days - 1,
                days
            );
            previous = current;
        }
    }

    #[test]
    fn test_days_remaining_floors_toward_negative_infinity() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();

        // Expired twelve hours ago: day -1, not day zero.
        let half_day_ago = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(days_remaining(now, half_day_ago), -1);

        // 36 hours ahead is a single whole day.
        let later = Utc.with_ymd_and_hms(2026, 1, 12, 0, 0, 0).unwrap();
        assert_eq!(days_remaining(now, later), 1);

        assert_eq!(days_remaining(now, now), 0);
    }

    #[test]
    fn test_report_constructors_keep_the_status_invariant() {
        let failed = CertReport::failed(
            "Example".to_string(),
            "example.com".to_string(),
            443,
            "failed to retrieve certificate: connection refused".to_string(),
        );
        assert_eq!(failed.status, Status::Error);
        assert!(failed.details().is_none());
        assert!(!failed.error_message().unwrap().is_empty());

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let checked = CertReport::checked(
            "Example".to_string(),
            "example.com".to_string(),
            443,
            Status::Ok,
            CertDetails {
                issuer: "Example CA".to_string(),
                subject: "example.com".to_string(),
                not_before: now,
                not_after: now,
                days_remaining: 90,
            },
        );
        assert!(checked.details().is_some());
        assert!(checked.error_message().is_none());
    }

    #[test]
    fn test_status_display_is_uppercase() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Warning.to_string(), "WARNING");
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
        assert_eq!(Status::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_status_colors_and_classes() {
        assert_eq!(Status::Ok.color(), 0x00FF00);
        assert_eq!(Status::Warning.color(), 0xFFA500);
        assert_eq!(Status::Critical.color(), 0xFF0000);
        assert_eq!(Status::Error.color(), 0x8B0000);

        assert_eq!(Status::Critical.css_class(), "critical");
        assert_eq!(Status::Ok.css_class(), "ok");
    }
}

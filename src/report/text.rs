//! Plain-text report renderer.

use chrono::{DateTime, Utc};

use crate::report::REPORT_TITLE;
use crate::timezone::DisplayZone;
use crate::{CertReport, Outcome};

const RULE_WIDTH: usize = 80;

/// Renders the batch as a fixed-width text report.
///
/// A banner and header first, then one block per result in batch order,
/// each closed by a dashed rule.
pub fn render(reports: &[CertReport], checked_at: DateTime<Utc>, zone: &DisplayZone) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push_str(&banner);
    out.push('\n');
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&format!("Checked at: {}\n", zone.datetime(checked_at)));
    out.push_str(&banner);
    out.push_str("\n\n");

    for report in reports {
        out.push_str(&format!("Site: {}\n", report.site_name));
        out.push_str(&format!("URL: {}:{}\n", report.url, report.port));
        out.push_str(&format!("Status: {}\n", report.status));

        match &report.outcome {
            Outcome::Checked(details) => {
                out.push_str(&format!("Issuer: {}\n", details.issuer));
                out.push_str(&format!("Subject: {}\n", details.subject));
                out.push_str(&format!(
                    "Valid from: {}\n",
                    zone.datetime_stamped(details.not_before)
                ));
                out.push_str(&format!(
                    "Valid until: {}\n",
                    zone.datetime_stamped(details.not_after)
                ));
                out.push_str(&format!("Days remaining: {}\n", details.days_remaining));
            }
            Outcome::Failed { message } => {
                out.push_str(&format!("Error: {}\n", message));
            }
        }

        out.push_str(&rule);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CertDetails, CertReport, Status};
    use chrono::TimeZone;

    fn sample_batch() -> Vec<CertReport> {
        let not_before = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let not_after = Utc.with_ymd_and_hms(2026, 10, 1, 23, 59, 59).unwrap();
        vec![
            CertReport::checked(
                "Example".to_string(),
                "example.com".to_string(),
                443,
                Status::Ok,
                CertDetails {
                    issuer: "Example CA".to_string(),
                    subject: "example.com".to_string(),
                    not_before,
                    not_after,
                    days_remaining: 57,
                },
            ),
            CertReport::failed(
                "Broken".to_string(),
                "broken.example".to_string(),
                8443,
                "failed to retrieve certificate: connection refused".to_string(),
            ),
        ]
    }

    #[test]
    fn test_report_layout() {
        let zone = DisplayZone::resolve("Asia/Tokyo");
        let checked_at = Utc.with_ymd_and_hms(2026, 8, 5, 3, 0, 0).unwrap();
        let report = render(&sample_batch(), checked_at, &zone);

        assert!(report.starts_with(&"=".repeat(80)));
        assert!(report.contains("TLS certificate expiry report"));
        assert!(report.contains("Checked at: 2026-08-05 12:00:00"));
        assert!(report.contains("Site: Example"));
        assert!(report.contains("URL: example.com:443"));
        assert!(report.contains("Status: OK"));
        assert!(report.contains("Issuer: Example CA"));
        assert!(report.contains("Valid until: 2026-10-02 08:59:59 JST"));
        assert!(report.contains("Days remaining: 57"));
        assert_eq!(report.matches(&"-".repeat(80)).count(), 2);
    }

    #[test]
    fn test_error_block_carries_the_message_instead_of_details() {
        let zone = DisplayZone::resolve("Asia/Tokyo");
        let checked_at = Utc.with_ymd_and_hms(2026, 8, 5, 3, 0, 0).unwrap();
        let report = render(&sample_batch(), checked_at, &zone);

        assert!(report.contains("Site: Broken"));
        assert!(report.contains("Status: ERROR"));
        assert!(report.contains("Error: failed to retrieve certificate: connection refused"));

        // The error block must not carry certificate fields.
        let error_block = report.split("Site: Broken").nth(1).unwrap();
        assert!(!error_block.contains("Issuer:"));
        assert!(!error_block.contains("Days remaining:"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let zone = DisplayZone::resolve("Asia/Tokyo");
        let checked_at = Utc.with_ymd_and_hms(2026, 8, 5, 3, 0, 0).unwrap();
        let batch = sample_batch();

        assert_eq!(
            render(&batch, checked_at, &zone),
            render(&batch, checked_at, &zone)
        );
    }
}

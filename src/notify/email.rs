//! Email dispatcher.
//!
//! Sends the text and HTML report renderings as a multipart/alternative
//! message. The transport mode follows the SMTP settings: implicit TLS,
//! mandatory STARTTLS, or a plain connection with opportunistic upgrade.

use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use crate::config::{EmailSettings, SmtpSettings};
use crate::notify::NotifyError;

/// Mails the report to every configured recipient.
///
/// Any stage failure (address parsing, message assembly, dial, handshake,
/// auth, envelope, data) surfaces as a single [`NotifyError`]; there is no
/// retry.
pub fn send_report(
    settings: &EmailSettings,
    text_report: &str,
    html_report: &str,
) -> Result<(), NotifyError> {
    let message = build_message(settings, text_report, html_report)?;
    let transport = build_transport(&settings.smtp)?;
    debug!(host = %settings.smtp.host, port = settings.smtp.port, "sending report email");
    transport.send(&message)?;
    Ok(())
}

/// Builds the multipart/alternative message with the two report parts as
/// siblings.
fn build_message(
    settings: &EmailSettings,
    text_report: &str,
    html_report: &str,
) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(settings.from.parse()?)
        .subject(settings.subject.clone());

    for to in &settings.to {
        builder = builder.to(to.parse()?);
    }

    let message = builder.multipart(
        MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(text_report.to_string()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(html_report.to_string()),
            ),
    )?;

    Ok(message)
}

/// Selects the SMTP transport for the configured mode.
///
/// `use_ssl` wins over `use_tls` when both are set. Credentials are
/// attached only when username and password are both non-empty.
fn build_transport(smtp: &SmtpSettings) -> Result<SmtpTransport, NotifyError> {
    let builder = if smtp.use_ssl {
        SmtpTransport::relay(&smtp.host)?
    } else if smtp.use_tls {
        SmtpTransport::starttls_relay(&smtp.host)?
    } else {
        let tls_parameters = TlsParameters::new(smtp.host.clone())?;
        SmtpTransport::builder_dangerous(&smtp.host).tls(Tls::Opportunistic(tls_parameters))
    };

    let mut builder = builder.port(smtp.port);
    if !smtp.username.is_empty() && !smtp.password.is_empty() {
        builder = builder.credentials(Credentials::new(
            smtp.username.clone(),
            smtp.password.clone(),
        ));
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            enabled: true,
            smtp: SmtpSettings {
                host: "smtp.example.com".to_string(),
                port: 587,
                use_ssl: false,
                use_tls: true,
                username: "alerts".to_string(),
                password: "secret".to_string(),
            },
            from: "alerts@example.com".to_string(),
            to: vec![
                "ops@example.com".to_string(),
                "oncall@example.com".to_string(),
            ],
            subject: "TLS certificate expiry report".to_string(),
        }
    }

    #[test]
    fn test_message_is_multipart_alternative() {
        let message = build_message(&settings(), "text body", "<html>html body</html>").unwrap();
        let rendered = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(rendered.contains("From: alerts@example.com"));
        assert!(rendered.contains("To: ops@example.com"));
        assert!(rendered.contains("oncall@example.com"));
        assert!(rendered.contains("Subject: TLS certificate expiry report"));
        assert!(rendered.contains("multipart/alternative"));
        assert!(rendered.contains("text/plain"));
        assert!(rendered.contains("text/html"));
        assert!(rendered.contains("text body"));
        assert!(rendered.contains("html body"));
    }

    #[test]
    fn test_invalid_from_address_is_reported() {
        let mut bad = settings();
        bad.from = "not an address".to_string();

        let err = build_message(&bad, "text", "html").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { .. }));
    }

    #[test]
    fn test_transport_builds_for_every_mode() {
        let mut smtp = settings().smtp;

        smtp.use_ssl = true;
        smtp.use_tls = false;
        assert!(build_transport(&smtp).is_ok());

        smtp.use_ssl = false;
        smtp.use_tls = true;
        assert!(build_transport(&smtp).is_ok());

        smtp.use_tls = false;
        assert!(build_transport(&smtp).is_ok());
    }

    #[test]
    fn test_transport_builds_without_credentials() {
        let mut smtp = settings().smtp;
        smtp.username = String::new();
        assert!(build_transport(&smtp).is_ok());
    }
}

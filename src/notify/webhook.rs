//! Webhook dispatcher.
//!
//! Posts one JSON document per run: a sender name plus a list of message
//! cards, one card per result that passes the notification policy. The
//! call is best-effort: transport errors fail the dispatch, but an HTTP
//! rejection by the far end is only logged.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{WebhookSettings, WEBHOOK_URL_PLACEHOLDER};
use crate::notify::NotifyError;
use crate::timezone::DisplayZone;
use crate::{CertReport, Outcome};

/// Sender display name carried in the payload.
const SENDER_NAME: &str = "certwatch";

#[derive(Debug, Serialize)]
struct Payload {
    username: String,
    embeds: Vec<MessageCard>,
}

#[derive(Debug, Serialize)]
struct MessageCard {
    title: String,
    color: u32,
    fields: Vec<CardField>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct CardField {
    name: String,
    value: String,
    inline: bool,
}

/// Sends the notification for a scan batch.
///
/// Resolves to a silent success when the webhook is disabled, the URL is
/// empty or still the placeholder, or no result passes the policy filter.
pub fn send_notification(
    settings: &WebhookSettings,
    reports: &[CertReport],
    zone: &DisplayZone,
    sent_at: DateTime<Utc>,
) -> Result<(), NotifyError> {
    if !settings.enabled {
        debug!("webhook notifications disabled");
        return Ok(());
    }
    if settings.url.is_empty() || settings.url == WEBHOOK_URL_PLACEHOLDER {
        info!("webhook URL not configured, skipping notification");
        return Ok(());
    }

    let selected: Vec<&CertReport> = reports
        .iter()
        .filter(|report| settings.should_notify(report.status))
        .collect();
    if selected.is_empty() {
        info!("no results match the webhook notification policy");
        return Ok(());
    }

    let payload = build_payload(&selected, zone, sent_at);

    let client = reqwest::blocking::Client::new();
    let response = client.post(&settings.url).json(&payload).send()?;

    let status = response.status();
    if status == StatusCode::NO_CONTENT || status.is_success() {
        info!(cards = payload.embeds.len(), "webhook notification sent");
    } else {
        warn!(status = %status, "webhook endpoint rejected the notification");
    }

    Ok(())
}

fn build_payload(reports: &[&CertReport], zone: &DisplayZone, sent_at: DateTime<Utc>) -> Payload {
    Payload {
        username: SENDER_NAME.to_string(),
        embeds: reports
            .iter()
            .map(|report| message_card(report, zone, sent_at))
            .collect(),
    }
}

fn message_card(report: &CertReport, zone: &DisplayZone, sent_at: DateTime<Utc>) -> MessageCard {
    let mut fields = vec![
        CardField {
            name: "URL".to_string(),
            value: format!("{}:{}", report.url, report.port),
            inline: true,
        },
        CardField {
            name: "Status".to_string(),
            value: report.status.to_string(),
            inline: true,
        },
    ];

    match &report.outcome {
        Outcome::Checked(details) => {
            fields.push(CardField {
                name: "Days remaining".to_string(),
                value: format!("{} days", details.days_remaining),
                inline: true,
            });
            fields.push(CardField {
                name: "Issuer".to_string(),
                value: details.issuer.clone(),
                inline: false,
            });
            fields.push(CardField {
                name: "Expiry".to_string(),
                value: zone.datetime_stamped(details.not_after),
                inline: false,
            });
        }
        Outcome::Failed { message } => {
            fields.push(CardField {
                name: "Error".to_string(),
                value: message.clone(),
                inline: false,
            });
        }
    }

    MessageCard {
        title: format!("🔒 {}", report.site_name),
        color: report.status.color(),
        fields,
        timestamp: sent_at.to_rfc3339(),
    }
}

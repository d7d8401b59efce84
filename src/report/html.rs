//! HTML report renderer.
//!
//! Produces a self-contained document (inline stylesheet, no external
//! resources) suitable for embedding as the HTML part of the report email.

use chrono::{DateTime, Utc};

use crate::report::REPORT_TITLE;
use crate::timezone::DisplayZone;
use crate::{CertReport, Outcome};

/// Renders the batch as a single HTML document with one table row per
/// result. Error rows merge the issuer/expiry/days cells into one message
/// cell; the status cell carries the lower-cased status as its CSS class.
pub fn render(reports: &[CertReport], checked_at: DateTime<Utc>, zone: &DisplayZone) -> String {
    let mut html = format!(
        r#"<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h1 {{ color: #333; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}
        th {{ background-color: #4CAF50; color: white; }}
        tr:nth-child(even) {{ background-color: #f2f2f2; }}
        .ok {{ color: green; font-weight: bold; }}
        .warning {{ color: orange; font-weight: bold; }}
        .critical {{ color: red; font-weight: bold; }}
        .error {{ color: darkred; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>Checked at: {checked_at}</p>
    <table>
        <tr>
            <th>Site</th>
            <th>URL</th>
            <th>Issuer</th>
            <th>Expiry</th>
            <th>Days Remaining</th>
            <th>Status</th>
        </tr>
"#,
        title = REPORT_TITLE,
        checked_at = zone.datetime(checked_at),
    );

    for report in reports {
        html.push_str(&table_row(report, zone));
    }

    html.push_str("    </table>\n</body>\n</html>");
    html
}

fn table_row(report: &CertReport, zone: &DisplayZone) -> String {
    let status_class = report.status.css_class();

    match &report.outcome {
        Outcome::Checked(details) => format!(
            r#"        <tr>
            <td>{site}</td>
            <td>{url}:{port}</td>
            <td>{issuer}</td>
            <td>{expiry}</td>
            <td>{days}</td>
            <td class="{class}">{status}</td>
        </tr>
"#,
            site = escape(&report.site_name),
            url = escape(&report.url),
            port = report.port,
            issuer = escape(&details.issuer),
            expiry = zone.date_stamped(details.not_after),
            days = details.days_remaining,
            class = status_class,
            status = report.status,
        ),
        Outcome::Failed { message } => format!(
            r#"        <tr>
            <td>{site}</td>
            <td>{url}:{port}</td>
            <td colspan="3">{message}</td>
            <td class="{class}">{status}</td>
        </tr>
"#,
            site = escape(&report.site_name),
            url = escape(&report.url),
            port = report.port,
            message = escape(message),
            class = status_class,
            status = report.status,
        ),
    }
}

/// Minimal HTML escaping for interpolated text.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

//! Report rendering over a scan batch.
//!
//! Both renderers are pure functions of the batch, the check instant and
//! the display timezone: identical input produces identical output.
//!
//! # Submodules
//!
//! - `text` - plain-text report for the console and the email text part
//! - `html` - self-contained HTML report for the email HTML part

pub mod html;
pub mod text;

/// Title shared by the text and HTML reports.
pub const REPORT_TITLE: &str = "TLS certificate expiry report";

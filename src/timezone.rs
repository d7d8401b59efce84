//! Display timezone handling.
//!
//! All human-facing timestamps are rendered in one configured timezone,
//! resolved once at startup. An unknown zone name falls back to a fixed
//! UTC+9 offset.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use tracing::warn;

const FALLBACK_OFFSET_SECONDS: i32 = 9 * 3600;

/// The timezone every displayed timestamp is converted into.
#[derive(Debug, Clone, Copy)]
pub enum DisplayZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Resolves an IANA zone name, falling back to UTC+9 when the name is
    /// unknown.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<Tz>() {
            Ok(tz) => DisplayZone::Named(tz),
            Err(_) => {
                warn!(timezone = name, "unknown timezone, falling back to UTC+9");
                DisplayZone::Fixed(
                    FixedOffset::east_opt(FALLBACK_OFFSET_SECONDS)
                        .expect("fallback offset is in range"),
                )
            }
        }
    }

    fn format(&self, instant: DateTime<Utc>, fmt: &str) -> String {
        match self {
            DisplayZone::Named(tz) => instant.with_timezone(tz).format(fmt).to_string(),
            DisplayZone::Fixed(offset) => instant.with_timezone(offset).format(fmt).to_string(),
        }
    }

    /// `YYYY-MM-DD HH:MM:SS` in the display zone.
    pub fn datetime(&self, instant: DateTime<Utc>) -> String {
        self.format(instant, "%Y-%m-%d %H:%M:%S")
    }

    /// `YYYY-MM-DD HH:MM:SS` followed by the zone label.
    pub fn datetime_stamped(&self, instant: DateTime<Utc>) -> String {
        self.format(instant, "%Y-%m-%d %H:%M:%S %Z")
    }

    /// `YYYY-MM-DD` followed by the zone label.
    pub fn date_stamped(&self, instant: DateTime<Utc>) -> String {
        self.format(instant, "%Y-%m-%d %Z")
    }
}

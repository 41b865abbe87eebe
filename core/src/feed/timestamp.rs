use crate::api::RawTimestamp;
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone observation times are shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
    /// Fixed offset east of UTC, in minutes.
    Offset { minutes: i32 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampFormatter {
    zone: DisplayZone,
}

impl TimestampFormatter {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        match self.zone {
            DisplayZone::Local => instant.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
            DisplayZone::Utc => instant.format(DISPLAY_FORMAT).to_string(),
            // out-of-range offsets fall back to UTC
            DisplayZone::Offset { minutes } => {
                match FixedOffset::east_opt(minutes.saturating_mul(60)) {
                    Some(offset) => instant.with_timezone(&offset).format(DISPLAY_FORMAT).to_string(),
                    None => instant.format(DISPLAY_FORMAT).to_string(),
                }
            }
        }
    }

    /// Unparseable values are shown verbatim, missing ones as `unknown`.
    pub fn format(&self, observed_at: Option<&RawTimestamp>) -> String {
        match observed_at {
            Some(raw) => raw
                .instant()
                .map(|instant| self.format_instant(instant))
                .unwrap_or_else(|| raw.raw_text()),
            None => "unknown".to_string(),
        }
    }
}

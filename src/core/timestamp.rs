//! Timestamp rendering for formatted entries
//!
//! Formatters render the entry time through a `TimestampFormat`. RFC 3339
//! is the default; the Unix variants become JSON numbers. Custom strftime
//! patterns are checked before use, so a bad pattern is reported as a
//! formatter error instead of aborting inside chrono.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the entry time is written
///
/// # Examples
///
/// ```
/// use rust_field_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now()).unwrap();
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45+00:00`
    #[default]
    Rfc3339,
    /// `2025-01-08T10:30:45.123Z`
    Iso8601,
    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,
    Unix,
    UnixMillis,
    UnixMicros,
    /// Any strftime pattern chrono understands
    Custom(String),
}

/// True when every item of `pattern` is a strftime specifier chrono knows
pub fn is_valid_strftime(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl TimestampFormat {
    /// Fails for a `Custom` pattern chrono cannot render
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(pattern) if !is_valid_strftime(pattern) => Err(
                LoggerError::formatter("timestamp", format!("invalid strftime pattern {:?}", pattern)),
            ),
            _ => Ok(()),
        }
    }

    /// Text form used by the text formatter and by JSON for non-numeric
    /// variants
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        self.validate()?;
        Ok(match self {
            TimestampFormat::Rfc3339 => {
                datetime.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
            }
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(pattern) => datetime.format(pattern).to_string(),
        })
    }

    pub fn format_json(&self, datetime: &DateTime<Utc>) -> Result<serde_json::Value> {
        Ok(match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().into(),
            _ => serde_json::Value::String(self.format(datetime)?),
        })
    }
}

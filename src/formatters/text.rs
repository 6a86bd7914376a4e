//! Human-readable key=value lines

use super::{prepare_fields, FieldKey, FieldMap, Formatter};
use crate::core::entry::Entry;
use crate::core::error::Result;
use crate::core::log_level::LogLevel;
use crate::core::timestamp::TimestampFormat;
use std::collections::BTreeMap;

/// Logfmt-style formatter.
///
/// Example: `@timestamp=2025-01-08T10:30:45+00:00 level=info message="Request processed" user=alice`
///
/// Entry attributes come first, then user fields sorted by key.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    timestamp_format: TimestampFormat,
    disable_timestamp: bool,
    colors: bool,
    field_map: FieldMap,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    /// Color the level name; has no effect without the `console` feature
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    #[cfg(feature = "console")]
    fn level_text(&self, level: LogLevel) -> String {
        use colored::Colorize;
        if self.colors {
            level.as_str().color(level.color_code()).to_string()
        } else {
            level.as_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_text(&self, level: LogLevel) -> String {
        level.as_str().to_string()
    }

    fn pair(&self, key: FieldKey, value: &str) -> String {
        format!("{}={}", self.field_map.resolve(key), escape_value(value))
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let data = prepare_fields(entry, &self.field_map);
        let mut parts = Vec::with_capacity(data.len() + 5);

        if !self.disable_timestamp {
            if let Some(time) = entry.time() {
                parts.push(self.pair(FieldKey::Time, &self.timestamp_format.format(&time)?));
            }
        }
        parts.push(format!(
            "{}={}",
            self.field_map.resolve(FieldKey::Level),
            self.level_text(entry.level())
        ));
        if !entry.message().is_empty() {
            parts.push(format!(
                "{}={}",
                self.field_map.resolve(FieldKey::Message),
                quote_value(entry.message())
            ));
        }
        if entry.has_caller() {
            if let Some(caller) = entry.caller() {
                parts.push(self.pair(FieldKey::Func, &caller.function));
                if let Some(location) = caller.location() {
                    parts.push(self.pair(FieldKey::File, &location));
                }
            }
        }

        let sorted: BTreeMap<&String, _> = data.iter().collect();
        for (key, value) in sorted {
            parts.push(format!(
                "{}={}",
                sanitize_key(key),
                escape_value(&value.to_string())
            ));
        }

        buf.extend_from_slice(parts.join(" ").as_bytes());
        buf.push(b'\n');
        Ok(())
    }
}

/// Quote a value if it would not survive a whitespace split
fn escape_value(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control())
    {
        quote_value(value)
    } else {
        value.to_string()
    }
}

/// Keys are never quoted; characters that would break the pair become `_`
fn sanitize_key(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    key.chars()
        .map(|c| {
            if c.is_whitespace() || c == '"' || c == '=' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn quote_value(value: &str) -> String {
    format!("{:?}", value)
}

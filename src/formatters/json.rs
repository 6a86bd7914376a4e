//! One JSON object per entry

use super::{prepare_fields, FieldKey, FieldMap, Formatter};
use crate::core::entry::Entry;
use crate::core::error::Result;
use crate::core::timestamp::TimestampFormat;

/// Key under which a structured payload is surfaced
pub const PAYLOAD_KEY: &str = "payload";

/// JSON formatter for machine processing
///
/// Example: `{"@timestamp":"2025-01-08T10:30:45+00:00","level":"info","message":"Request processed"}`
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
    disable_timestamp: bool,
    pretty: bool,
    field_map: FieldMap,
}

impl JsonFormatter {
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

    /// Indent the output; each entry then spans several lines
    #[must_use = "builder methods return a new value"]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in prepare_fields(entry, &self.field_map) {
            json_obj.insert(key, value.to_json_value());
        }

        if let Some(payload) = entry.payload() {
            if !json_obj.contains_key(PAYLOAD_KEY) {
                json_obj.insert(PAYLOAD_KEY.to_string(), payload.to_json_value());
            }
        }

        if !self.disable_timestamp {
            if let Some(time) = entry.time() {
                json_obj.insert(
                    self.field_map.resolve(FieldKey::Time).to_string(),
                    self.timestamp_format.format_json(&time)?,
                );
            }
        }
        json_obj.insert(
            self.field_map.resolve(FieldKey::Level).to_string(),
            serde_json::Value::String(entry.level().as_str().to_string()),
        );
        json_obj.insert(
            self.field_map.resolve(FieldKey::Message).to_string(),
            serde_json::Value::String(entry.message().to_string()),
        );

        if entry.has_caller() {
            if let Some(caller) = entry.caller() {
                json_obj.insert(
                    self.field_map.resolve(FieldKey::Func).to_string(),
                    serde_json::Value::String(caller.function.clone()),
                );
                if let Some(location) = caller.location() {
                    json_obj.insert(
                        self.field_map.resolve(FieldKey::File).to_string(),
                        serde_json::Value::String(location),
                    );
                }
            }
        }

        let value = serde_json::Value::Object(json_obj);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *buf, &value)?;
        } else {
            serde_json::to_writer(&mut *buf, &value)?;
        }
        buf.push(b'\n');
        Ok(())
    }
}

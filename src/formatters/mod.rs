//! Formatters turn a finalized entry into bytes for the sink
//!
//! A formatter never mutates the entry it is given. Reserved keys that
//! collide with user fields are handled on a copy of the field map by
//! [`prefix_field_clashes`].

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::core::entry::Entry;
use crate::core::error::Result;
use crate::core::fields::{FieldValue, Fields};
use std::collections::HashMap;

pub trait Formatter: Send + Sync {
    /// Append the rendered entry, including its line terminator, to `buf`
    fn format(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()>;
}

/// Keys formatters write for entry attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Message,
    Level,
    Time,
    LoggerError,
    Func,
    File,
}

impl FieldKey {
    pub fn default_name(self) -> &'static str {
        match self {
            FieldKey::Message => "message",
            FieldKey::Level => "level",
            FieldKey::Time => "@timestamp",
            FieldKey::LoggerError => "error",
            FieldKey::Func => "func",
            FieldKey::File => "file",
        }
    }
}

/// Renames for the default keys
///
/// ```
/// use rust_field_logger::formatters::{FieldKey, FieldMap};
///
/// let map = FieldMap::new().with(FieldKey::Message, "msg");
/// assert_eq!(map.resolve(FieldKey::Message), "msg");
/// assert_eq!(map.resolve(FieldKey::Level), "level");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    overrides: HashMap<FieldKey, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with(mut self, key: FieldKey, name: impl Into<String>) -> Self {
        self.overrides.insert(key, name.into());
        self
    }

    pub fn resolve(&self, key: FieldKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_name())
    }
}

/// Move user fields that collide with reserved keys to `fields.<key>`
pub fn prefix_field_clashes(data: &mut Fields, field_map: &FieldMap, report_caller: bool) {
    let mut reserved = vec![
        FieldKey::Time,
        FieldKey::Message,
        FieldKey::Level,
        FieldKey::LoggerError,
    ];
    if report_caller {
        reserved.extend([FieldKey::Func, FieldKey::File]);
    }

    for key in reserved {
        let name = field_map.resolve(key);
        if let Some(value) = data.remove(name) {
            data.insert(format!("fields.{}", name), value);
        }
    }
}

/// Copy of the entry's fields ready for rendering: clashes renamed and any
/// field attachment note placed under the error key
pub(crate) fn prepare_fields(entry: &Entry, field_map: &FieldMap) -> Fields {
    let mut data = entry.data().clone();
    prefix_field_clashes(&mut data, field_map, entry.has_caller());
    if let Some(note) = entry.field_error() {
        data.insert(
            field_map.resolve(FieldKey::LoggerError).to_string(),
            FieldValue::from(note),
        );
    }
    data
}

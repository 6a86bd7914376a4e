//! A single log event in flight
//!
//! Entries are built with copy-on-write calls: every `with_*` method returns
//! a new entry holding a copy of the field map plus the addition, and leaves
//! the receiver untouched. Chains can therefore be shared across threads up
//! to the point where a severity method writes them.

use super::caller::{resolve_caller, Caller};
use super::error::{LoggerError, PanicEvent, Result};
use super::fields::{FieldValue, Fields};
use super::lock::LockMode;
use super::log_level::LogLevel;
use super::logger::{Logger, LoggerState};
use super::pool::buffer_pool;
use crate::formatters::Formatter;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Field key used by [`Entry::with_error`]
pub const ERROR_KEY: &str = "error";

/// Opaque context carried through an entry for formatters and hooks
pub type Context = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct Entry {
    logger: Logger,
    data: Fields,
    time: Option<DateTime<Utc>>,
    level: LogLevel,
    caller: Option<Caller>,
    message: String,
    context: Option<Context>,
    field_error: String,
    payload: Option<FieldValue>,
}

impl Entry {
    pub fn new(logger: &Logger) -> Self {
        Self::with_data(logger, Fields::with_capacity(6))
    }

    pub(crate) fn with_data(logger: &Logger, data: Fields) -> Self {
        Self {
            logger: logger.clone(),
            data,
            time: None,
            level: LogLevel::default(),
            caller: None,
            message: String::new(),
            context: None,
            field_error: String::new(),
            payload: None,
        }
    }

    pub(crate) fn into_data(self) -> Fields {
        self.data
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn data(&self) -> &Fields {
        &self.data
    }

    /// Mutable access for hooks that enrich the entry before it is written
    pub fn data_mut(&mut self) -> &mut Fields {
        &mut self.data
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    /// True when the logger reports callers and one was resolved
    pub fn has_caller(&self) -> bool {
        self.logger.report_caller() && self.caller.is_some()
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Downcast the attached context
    pub fn context_ref<C: Any>(&self) -> Option<&C> {
        self.context.as_ref()?.downcast_ref::<C>()
    }

    /// Notes about fields that could not be attached, comma-joined
    pub fn field_error(&self) -> Option<&str> {
        if self.field_error.is_empty() {
            None
        } else {
            Some(&self.field_error)
        }
    }

    /// Structured record passed to `log`, kept for formatters
    pub fn payload(&self) -> Option<&FieldValue> {
        self.payload.as_ref()
    }

    /// Copy of this entry's builder state with a new field map
    fn derive(&self, data: Fields) -> Entry {
        Entry {
            logger: self.logger.clone(),
            data,
            time: self.time,
            level: LogLevel::default(),
            caller: None,
            message: String::new(),
            context: self.context.clone(),
            field_error: self.field_error.clone(),
            payload: None,
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
        self.with_fields([(key, value)])
    }

    /// Merge fields into a copy of this entry.
    ///
    /// Callable values are not stored; each one appends a
    /// `can not add field "<key>"` note to the copy's field error.
    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields = fields.into_iter();
        let mut data = Fields::with_capacity(self.data.len() + fields.size_hint().0);
        data.extend(self.data.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut field_error = self.field_error.clone();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            if value.is_callable() {
                if !field_error.is_empty() {
                    field_error.push_str(", ");
                }
                field_error.push_str(&format!("can not add field {:?}", key));
            } else {
                data.insert(key, value);
            }
        }

        let mut entry = self.derive(data);
        entry.field_error = field_error;
        entry
    }

    pub fn with_time(&self, time: DateTime<Utc>) -> Entry {
        let mut entry = self.derive(self.data.clone());
        entry.time = Some(time);
        entry
    }

    pub fn with_context<C: Any + Send + Sync>(&self, context: C) -> Entry {
        let mut entry = self.derive(self.data.clone());
        entry.context = Some(Arc::new(context));
        entry
    }

    /// Shorthand for `with_field("error", err.to_string())`
    pub fn with_error<E: std::error::Error + ?Sized>(&self, err: &E) -> Entry {
        self.with_field(ERROR_KEY, err.to_string())
    }

    /// Log `message` at `level` if the logger enables it.
    ///
    /// A `payload` that is a structured record is kept on the written entry
    /// for formatters; primitives are ignored. At Panic level the written
    /// entry comes back as `Err(PanicEvent)`.
    pub fn log(
        &self,
        level: LogLevel,
        payload: Option<FieldValue>,
        message: impl fmt::Display,
    ) -> std::result::Result<(), PanicEvent> {
        if !self.logger.is_level_enabled(level) {
            return Ok(());
        }
        let entry = self.emit(level, payload, message.to_string());
        if level <= LogLevel::Panic {
            Err(PanicEvent::new(entry))
        } else {
            Ok(())
        }
    }

    /// Like [`Entry::log`], joining the arguments with single spaces
    pub fn logln(
        &self,
        level: LogLevel,
        payload: Option<FieldValue>,
        args: &[&dyn fmt::Display],
    ) -> std::result::Result<(), PanicEvent> {
        if !self.logger.is_level_enabled(level) {
            return Ok(());
        }
        let message = args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.log(level, payload, message)
    }

    /// Finalize a copy of this entry and push it through hooks and the sink
    fn emit(&self, level: LogLevel, payload: Option<FieldValue>, message: String) -> Entry {
        let mut entry = self.clone();
        if entry.time.is_none() {
            entry.time = Some(Utc::now());
        }
        entry.level = level;
        if !message.is_empty() {
            entry.message = message;
        }
        if let Some(record) = payload.filter(FieldValue::is_record) {
            entry.payload = Some(record);
        }

        let shared = self.logger.shared();
        let formatter = self.logger.formatter();
        match shared.state.mode() {
            LockMode::Mutex => {
                {
                    let _state = shared.state.lock();
                    entry.resolve_caller();
                }
                entry.fire_hooks(&mut shared.state.lock());
                entry.write(formatter.as_ref(), &mut shared.state.lock());
            }
            LockMode::Unsynchronized => {
                let mut state = shared.state.lock();
                entry.resolve_caller();
                entry.fire_hooks(&mut state);
                entry.write(formatter.as_ref(), &mut state);
            }
        }
        entry
    }

    fn resolve_caller(&mut self) {
        if self.logger.report_caller() {
            self.caller = resolve_caller();
        }
    }

    fn fire_hooks(&mut self, state: &mut LoggerState) {
        if let Err(e) = state.hooks.fire(self.level, self) {
            self.logger.shared().metrics.record_hook_failure();
            eprintln!("[LOGGER ERROR] Failed to fire hook: {}", e);
        }
    }

    fn write(&self, formatter: &dyn Formatter, state: &mut LoggerState) {
        let shared = self.logger.shared();
        let mut buffer = buffer_pool().acquire();

        if let Err(e) = formatter.format(self, &mut buffer) {
            shared.metrics.record_dropped();
            eprintln!("[LOGGER ERROR] Failed to format entry: {}", e);
            return;
        }
        if let Err(e) = state.out.write_all(&buffer) {
            shared.metrics.record_dropped();
            eprintln!("[LOGGER ERROR] Failed to write to log: {}", e);
            return;
        }
        shared.metrics.record_logged();
    }

    /// Serialize with the logger's formatter without writing
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let formatter = self.logger.formatter();
        let mut buffer = Vec::new();
        formatter.format(self, &mut buffer)?;
        Ok(buffer)
    }

    pub fn render(&self) -> Result<String> {
        String::from_utf8(self.bytes()?)
            .map_err(|e| LoggerError::formatter("utf8", e.to_string()))
    }

    #[inline]
    pub fn trace(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Trace, None, message);
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Debug, None, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Info, None, message);
    }

    #[inline]
    pub fn print(&self, message: impl fmt::Display) {
        self.info(message);
    }

    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Warn, None, message);
    }

    #[inline]
    pub fn warning(&self, message: impl fmt::Display) {
        self.warn(message);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Error, None, message);
    }

    /// Log at Fatal, then exit the process with code 1
    pub fn fatal(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Fatal, None, message);
        self.logger.exit(1);
    }

    /// Log at Panic and hand back the written entry
    pub fn panic(&self, message: impl fmt::Display) -> std::result::Result<(), PanicEvent> {
        Err(PanicEvent::new(self.emit(
            LogLevel::Panic,
            None,
            message.to_string(),
        )))
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("time", &self.time)
            .field("data", &self.data)
            .field("caller", &self.caller)
            .field("has_context", &self.context.is_some())
            .field("field_error", &self.field_error)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use chrono::TimeZone;

    #[test]
    fn test_with_field_is_copy_on_write() {
        let logger = Logger::new();
        let base = Entry::new(&logger).with_field("service", "api");
        let derived = base.with_field("user", "a");

        assert_eq!(base.data().len(), 1);
        assert_eq!(derived.data().len(), 2);
        assert_eq!(derived.data().get("service"), Some(&FieldValue::from("api")));
    }

    #[test]
    fn test_with_fields_later_values_win() {
        let logger = Logger::new();
        let entry = Entry::new(&logger)
            .with_fields(fields! { "a" => 1, "b" => 2 })
            .with_fields(fields! { "b" => 3, "c" => 4 });

        assert_eq!(entry.data().get("a"), Some(&FieldValue::Int(1)));
        assert_eq!(entry.data().get("b"), Some(&FieldValue::Int(3)));
        assert_eq!(entry.data().get("c"), Some(&FieldValue::Int(4)));
    }

    #[test]
    fn test_callable_field_rejected_with_note() {
        let logger = Logger::new();
        let callback = || 1;
        let entry = Entry::new(&logger)
            .with_field("cb", FieldValue::function(&callback))
            .with_field("ok", true);

        assert!(!entry.data().contains_key("cb"));
        assert!(entry.data().contains_key("ok"));
        assert_eq!(entry.field_error(), Some("can not add field \"cb\""));
    }

    #[test]
    fn test_field_errors_are_comma_joined() {
        let logger = Logger::new();
        let f = |x: u8| x;
        let entry = Entry::new(&logger)
            .with_field("first", FieldValue::function(&f))
            .with_field("second", FieldValue::function(&f));

        assert_eq!(
            entry.field_error(),
            Some("can not add field \"first\", can not add field \"second\"")
        );
    }

    #[test]
    fn test_with_time_and_context_keep_fields() {
        let logger = Logger::new();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        let entry = Entry::new(&logger)
            .with_field("k", "v")
            .with_time(at)
            .with_context(String::from("trace-42"));

        assert_eq!(entry.time(), Some(at));
        assert_eq!(entry.data().len(), 1);
        assert_eq!(entry.context_ref::<String>().map(String::as_str), Some("trace-42"));
        assert!(entry.context_ref::<u32>().is_none());
    }

    #[test]
    fn test_with_error_uses_error_key() {
        let logger = Logger::new();
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing config");
        let entry = Entry::new(&logger).with_error(&err);
        assert_eq!(
            entry.data().get(ERROR_KEY),
            Some(&FieldValue::from("missing config"))
        );
    }
}

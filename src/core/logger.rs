//! Main logger implementation

use super::{
    entry::Entry,
    error::PanicEvent,
    exit::{default_exit_func, ExitFunc, ExitHandlers},
    fields::FieldValue,
    hooks::{Hook, LevelHooks},
    lock::{LockMode, StateLock},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    pool::{EntryPool, DEFAULT_ENTRY_POOL_CAPACITY},
};
use crate::formatters::{Formatter, TextFormatter};
use crate::sinks::{FanOutWriter, RotatingFileWriter, RotationMode};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// State guarded by the logger lock
pub(crate) struct LoggerState {
    pub(crate) out: Box<dyn Write + Send>,
    pub(crate) hooks: LevelHooks,
}

pub(crate) struct LoggerShared {
    level: AtomicU8,
    report_caller: AtomicBool,
    pub(crate) state: StateLock<LoggerState>,
    /// Kept outside `state` so hooks can render entries while it is held
    formatter: RwLock<Arc<dyn Formatter>>,
    entry_pool: EntryPool,
    pub(crate) metrics: LoggerMetrics,
    exit_handlers: ExitHandlers,
    exit_func: RwLock<ExitFunc>,
}

/// A cheaply clonable handle to a shared logger.
///
/// Clones log through the same sink, formatter, hooks and threshold.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<LoggerShared>,
}

impl Logger {
    /// Logger writing text to stderr at Info level
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(crate) fn shared(&self) -> &LoggerShared {
        &self.shared
    }

    /// Fresh entry backed by a pooled field map
    pub(crate) fn new_entry(&self) -> Entry {
        Entry::with_data(self, self.shared.entry_pool.acquire())
    }

    /// Return an entry's field map to this logger's pool
    pub(crate) fn release_entry(&self, entry: Entry) {
        if Arc::ptr_eq(&entry.logger().shared, &self.shared) {
            self.shared.entry_pool.release(entry.into_data());
        }
    }

    fn with_pooled<R>(&self, f: impl FnOnce(&Entry) -> R) -> R {
        let entry = self.new_entry();
        let result = f(&entry);
        self.release_entry(entry);
        result
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
        self.with_pooled(|entry| entry.with_field(key, value))
    }

    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.with_pooled(|entry| entry.with_fields(fields))
    }

    pub fn with_error<E: std::error::Error + ?Sized>(&self, err: &E) -> Entry {
        self.with_pooled(|entry| entry.with_error(err))
    }

    pub fn with_context<C: Any + Send + Sync>(&self, context: C) -> Entry {
        self.with_pooled(|entry| entry.with_context(context))
    }

    pub fn with_time(&self, time: DateTime<Utc>) -> Entry {
        self.with_pooled(|entry| entry.with_time(time))
    }

    /// Log at `level`; see [`Entry::log`]
    pub fn log(
        &self,
        level: LogLevel,
        payload: Option<FieldValue>,
        message: impl fmt::Display,
    ) -> Result<(), PanicEvent> {
        if !self.is_level_enabled(level) {
            return Ok(());
        }
        self.with_pooled(|entry| entry.log(level, payload, message))
    }

    pub fn logln(
        &self,
        level: LogLevel,
        payload: Option<FieldValue>,
        args: &[&dyn fmt::Display],
    ) -> Result<(), PanicEvent> {
        if !self.is_level_enabled(level) {
            return Ok(());
        }
        self.with_pooled(|entry| entry.logln(level, payload, args))
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

    /// Log at Fatal, then exit with code 1
    pub fn fatal(&self, message: impl fmt::Display) {
        let _ = self.log(LogLevel::Fatal, None, message);
        self.exit(1);
    }

    /// Log at Panic and hand back the written entry as `Err`.
    ///
    /// The caller decides whether to unwind, e.g. `panic!("{}", event)`.
    pub fn panic(&self, message: impl fmt::Display) -> Result<(), PanicEvent> {
        self.with_pooled(|entry| entry.panic(message))
    }

    /// Flush the sink, run the registered exit handlers, then the exit
    /// function
    pub fn exit(&self, code: i32) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush log before exit: {}", e);
        }
        self.shared.exit_handlers.run();
        let exit_func = self.shared.exit_func.read().clone();
        exit_func(code);
    }

    pub fn set_level(&self, level: LogLevel) {
        self.shared.level.store(level.as_u8(), Ordering::Release);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.shared.level.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// True when events at `level` pass the current threshold
    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level.is_enabled_at(self.level())
    }

    pub fn add_hook<H: Hook + 'static>(&self, hook: H) {
        self.add_shared_hook(Arc::new(hook));
    }

    pub fn add_shared_hook(&self, hook: Arc<dyn Hook>) {
        self.shared.state.lock().hooks.add(hook);
    }

    /// Swap in a new hook registry and return the previous one
    pub fn replace_hooks(&self, hooks: LevelHooks) -> LevelHooks {
        std::mem::replace(&mut self.shared.state.lock().hooks, hooks)
    }

    pub fn set_formatter<F: Formatter + 'static>(&self, formatter: F) {
        *self.shared.formatter.write() = Arc::new(formatter);
    }

    pub fn formatter(&self) -> Arc<dyn Formatter> {
        self.shared.formatter.read().clone()
    }

    pub fn set_output<W: Write + Send + 'static>(&self, out: W) {
        self.shared.state.lock().out = Box::new(out);
    }

    /// Route output through a time-rotated file.
    ///
    /// `RotationMode::Tee` keeps the current sink as a second destination.
    pub fn set_rotating_output(&self, writer: RotatingFileWriter, mode: RotationMode) {
        let rotating: Box<dyn Write + Send> = Box::new(writer);
        let mut state = self.shared.state.lock();
        let out = match mode {
            RotationMode::Replace => rotating,
            RotationMode::Tee => {
                let previous = std::mem::replace(&mut state.out, Box::new(io::sink()));
                Box::new(FanOutWriter::new(vec![rotating, previous]))
            }
        };
        state.out = out;
    }

    pub fn set_report_caller(&self, enabled: bool) {
        let _state = self.shared.state.lock();
        self.shared.report_caller.store(enabled, Ordering::Release);
    }

    pub fn report_caller(&self) -> bool {
        self.shared.report_caller.load(Ordering::Acquire)
    }

    /// Replace the function called by [`Logger::exit`]
    pub fn set_exit_func<F>(&self, exit_func: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        *self.shared.exit_func.write() = Arc::new(exit_func);
    }

    /// Register a handler run before a Fatal event exits the process
    pub fn add_exit_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.exit_handlers.register(Box::new(handler));
    }

    pub fn exit_handler_count(&self) -> usize {
        self.shared.exit_handlers.len()
    }

    pub fn lock_mode(&self) -> LockMode {
        self.shared.state.mode()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Entries lost to formatter or sink failures
    pub fn dropped_count(&self) -> u64 {
        self.shared.metrics.dropped_count()
    }

    pub fn flush(&self) -> crate::core::error::Result<()> {
        self.shared.state.lock().out.flush()?;
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("report_caller", &self.report_caller())
            .field("lock_mode", &self.lock_mode())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_field_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .formatter(JsonFormatter::new())
///     .output(std::io::stdout())
///     .report_caller(true)
///     .build();
/// assert!(logger.is_level_enabled(LogLevel::Debug));
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    formatter: Option<Arc<dyn Formatter>>,
    output: Option<Box<dyn Write + Send>>,
    report_caller: bool,
    hooks: LevelHooks,
    lock_mode: LockMode,
    exit_func: Option<ExitFunc>,
    exit_handlers: Vec<Box<dyn Fn() + Send + Sync>>,
    entry_pool_capacity: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            formatter: None,
            output: None,
            report_caller: false,
            hooks: LevelHooks::new(),
            lock_mode: LockMode::Mutex,
            exit_func: None,
            exit_handlers: Vec::new(),
            entry_pool_capacity: DEFAULT_ENTRY_POOL_CAPACITY,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Set the sink; defaults to stderr
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, out: W) -> Self {
        self.output = Some(Box::new(out));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.add(Arc::new(hook));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn lock_mode(mut self, mode: LockMode) -> Self {
        self.lock_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_func<F>(mut self, exit_func: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_func = Some(Arc::new(exit_func));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit_handlers.push(Box::new(handler));
        self
    }

    /// Number of recycled field maps kept by the logger
    #[must_use = "builder methods return a new value"]
    pub fn entry_pool_capacity(mut self, capacity: usize) -> Self {
        self.entry_pool_capacity = capacity;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let state = LoggerState {
            out: self.output.unwrap_or_else(|| Box::new(io::stderr())),
            hooks: self.hooks,
        };
        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(TextFormatter::default()));

        let exit_handlers = ExitHandlers::default();
        for handler in self.exit_handlers {
            exit_handlers.register(handler);
        }

        Logger {
            shared: Arc::new(LoggerShared {
                level: AtomicU8::new(self.level.as_u8()),
                report_caller: AtomicBool::new(self.report_caller),
                state: StateLock::new(self.lock_mode, state),
                formatter: RwLock::new(formatter),
                entry_pool: EntryPool::new(self.entry_pool_capacity),
                metrics: LoggerMetrics::new(),
                exit_handlers,
                exit_func: RwLock::new(self.exit_func.unwrap_or_else(default_exit_func)),
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

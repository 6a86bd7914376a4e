//! Process-wide standard logger
//!
//! The standard logger is built from defaults the first time it is used,
//! unless the embedder installs one beforehand. The free functions below
//! forward to it.

use crate::core::entry::Entry;
use crate::core::error::{LoggerError, PanicEvent, Result};
use crate::core::fields::FieldValue;
use crate::core::hooks::Hook;
use crate::core::log_level::LogLevel;
use crate::core::logger::Logger;
use crate::formatters::Formatter;
use crate::sinks::{RotatingFileWriter, RotationMode};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::path::Path;

static STANDARD_LOGGER: OnceCell<Logger> = OnceCell::new();

/// The standard logger, built with defaults on first access
pub fn standard_logger() -> &'static Logger {
    STANDARD_LOGGER.get_or_init(Logger::new)
}

/// Install `logger` as the standard logger.
///
/// # Errors
///
/// Fails with `InvalidConfiguration` once the standard logger exists,
/// whether installed or built on first use.
pub fn install_standard_logger(logger: Logger) -> Result<()> {
    STANDARD_LOGGER.set(logger).map_err(|_| {
        LoggerError::config(
            "standard logger",
            "already initialized; install it before the first log call",
        )
    })
}

pub fn set_output<W: Write + Send + 'static>(out: W) {
    standard_logger().set_output(out);
}

/// Tee the standard logger into a time-rotated file.
///
/// See [`RotatingFileWriter::open`] for the template rules.
pub fn set_output_file(
    base_path: impl AsRef<Path>,
    name_template: impl Into<String>,
    time_format: impl Into<String>,
) -> Result<()> {
    let writer = RotatingFileWriter::open(base_path, name_template, time_format)?;
    standard_logger().set_rotating_output(writer, RotationMode::Tee);
    Ok(())
}

pub fn set_formatter<F: Formatter + 'static>(formatter: F) {
    standard_logger().set_formatter(formatter);
}

pub fn set_report_caller(enabled: bool) {
    standard_logger().set_report_caller(enabled);
}

pub fn set_level(level: LogLevel) {
    standard_logger().set_level(level);
}

pub fn level() -> LogLevel {
    standard_logger().level()
}

pub fn is_level_enabled(level: LogLevel) -> bool {
    standard_logger().is_level_enabled(level)
}

pub fn add_hook<H: Hook + 'static>(hook: H) {
    standard_logger().add_hook(hook);
}

pub fn with_field(key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
    standard_logger().with_field(key, value)
}

pub fn with_fields<I, K, V>(fields: I) -> Entry
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    standard_logger().with_fields(fields)
}

pub fn with_error<E: std::error::Error + ?Sized>(err: &E) -> Entry {
    standard_logger().with_error(err)
}

pub fn with_context<C: Any + Send + Sync>(context: C) -> Entry {
    standard_logger().with_context(context)
}

pub fn with_time(time: DateTime<Utc>) -> Entry {
    standard_logger().with_time(time)
}

pub fn trace(message: impl fmt::Display) {
    standard_logger().trace(message);
}

pub fn debug(message: impl fmt::Display) {
    standard_logger().debug(message);
}

pub fn info(message: impl fmt::Display) {
    standard_logger().info(message);
}

pub fn print(message: impl fmt::Display) {
    standard_logger().print(message);
}

pub fn warn(message: impl fmt::Display) {
    standard_logger().warn(message);
}

pub fn warning(message: impl fmt::Display) {
    standard_logger().warning(message);
}

pub fn error(message: impl fmt::Display) {
    standard_logger().error(message);
}

pub fn fatal(message: impl fmt::Display) {
    standard_logger().fatal(message);
}

pub fn panic(message: impl fmt::Display) -> std::result::Result<(), PanicEvent> {
    standard_logger().panic(message)
}

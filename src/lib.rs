//! # Rust Field Logger
//!
//! A structured, leveled logging library: entries carry key/value fields,
//! pass through per-level hooks, and are rendered by a pluggable formatter
//! into any `Write` sink.
//!
//! ## Features
//!
//! - **Structured fields**: copy-on-write entries built with `with_field`
//! - **Hooks**: synchronous observers registered per level
//! - **Formatters**: logfmt-style text and JSON
//! - **Rotation**: time-stamped files that roll over when the stamp changes
//! - **Caller reporting**: optional call-site capture
//!
//! ```
//! use rust_field_logger::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .formatter(JsonFormatter::new())
//!     .output(buffer.clone())
//!     .build();
//!
//! logger.with_field("user", "alice").info("logged in");
//! assert!(buffer.contents().contains("\"user\":\"alice\""));
//! ```

pub mod core;
pub mod formatters;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Entry, FieldValue, Fields, FnHook, Hook, LevelHooks, LockMode, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, PanicEvent, Result,
        TimestampFormat,
    };
    pub use crate::formatters::{FieldKey, FieldMap, Formatter, JsonFormatter, TextFormatter};
    pub use crate::global::standard_logger;
    pub use crate::sinks::{FanOutWriter, RotatingFileWriter, RotationMode, SharedBuffer};
}

pub use crate::core::{
    BoxError, Caller, Entry, FieldValue, Fields, FnHook, Hook, LevelHooks, LockMode, LogLevel,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, OutputTarget,
    PanicEvent, Result, TimestampFormat,
};
pub use formatters::{Formatter, JsonFormatter, TextFormatter};
pub use global::{install_standard_logger, standard_logger};
pub use sinks::{RotatingFileWriter, RotationMode};

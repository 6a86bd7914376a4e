//! Logging macros for ergonomic log message formatting.
//!
//! The level macros accept a [`Logger`](crate::Logger) or an
//! [`Entry`](crate::Entry) and forward `format_args!` to the plain methods,
//! so no string is built for a disabled level.
//!
//! # Examples
//!
//! ```
//! use rust_field_logger::prelude::*;
//! use rust_field_logger::{fields, info, warn};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = logger.with_fields(fields! { "user" => "alice", "attempt" => 3 });
//! warn!(request, "Login retry {} of {}", 3, 5);
//! ```

/// Log a message at an explicit level; evaluates to the `log` result.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_field_logger::log;
/// let _ = log!(logger, LogLevel::Info, "Simple message");
/// let _ = log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::option::Option::None, ::std::format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}

/// Log a fatal message, then exit through the logger's exit function.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
}

/// Build a [`Fields`](crate::Fields) map.
///
/// ```
/// use rust_field_logger::{fields, FieldValue};
///
/// let fields = fields! { "user" => "alice", "attempt" => 3 };
/// assert_eq!(fields.get("attempt"), Some(&FieldValue::Int(3)));
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(
                ::std::string::String::from($key),
                $crate::FieldValue::from($value),
            );
        )+
        fields
    }};
}

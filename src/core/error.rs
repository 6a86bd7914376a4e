//! Error types for the logger system

use super::entry::Entry;
use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Boxed error returned by hooks and other user-supplied collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unrecognized level text
    #[error("not a valid log level: {value:?}")]
    InvalidLevel { value: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// A hook returned an error; later hooks for the same event were skipped
    #[error("Hook '{hook}' failed: {source}")]
    HookFailed {
        hook: String,
        #[source]
        source: BoxError,
    },
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            value: value.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a hook failure error
    pub fn hook(hook: impl Into<String>, source: BoxError) -> Self {
        LoggerError::HookFailed {
            hook: hook.into(),
            source,
        }
    }
}

/// A Panic-severity event that has been written.
///
/// Returned instead of unwinding so the caller can inspect the finalized
/// entry and decide whether to propagate it further (`?`) or recover.
#[must_use = "a Panic event should be propagated or handled"]
pub struct PanicEvent {
    entry: Box<Entry>,
}

impl PanicEvent {
    pub(crate) fn new(entry: Entry) -> Self {
        Self {
            entry: Box::new(entry),
        }
    }

    /// The finalized entry that was logged
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn into_entry(self) -> Entry {
        *self.entry
    }
}

impl fmt::Debug for PanicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicEvent")
            .field("entry", &self.entry)
            .finish()
    }
}

impl fmt::Display for PanicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry.message())
    }
}

impl std::error::Error for PanicEvent {}

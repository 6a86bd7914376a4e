//! Declarative logger configuration
//!
//! `LoggerConfig` is a serde document describing a logger; embedders load
//! it from whatever format they use for settings and call
//! [`LoggerConfig::build`].

use super::error::Result;
use super::lock::LockMode;
use super::log_level::LogLevel;
use super::logger::{Logger, LoggerBuilder};
use super::timestamp::TimestampFormat;
use crate::formatters::{JsonFormatter, TextFormatter};
use crate::sinks::RotatingFileWriter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where rendered entries go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputTarget {
    #[default]
    Stderr,
    Stdout,
    RotatingFile {
        base_path: PathBuf,
        name_template: String,
        time_format: String,
        #[serde(default)]
        compress: bool,
    },
}

/// # Examples
///
/// ```
/// use rust_field_logger::{LoggerConfig, LogLevel};
///
/// let config = LoggerConfig::from_json_str(r#"{"level": "warning", "format": "json"}"#)?;
/// assert_eq!(config.level, LogLevel::Warn);
/// let logger = config.build()?;
/// assert!(!logger.is_level_enabled(LogLevel::Info));
/// # Ok::<(), rust_field_logger::LoggerError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub report_caller: bool,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub output: OutputTarget,
    pub lock_mode: LockMode,
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder preloaded with this configuration
    ///
    /// # Errors
    ///
    /// Returns `FormatterError` for an invalid custom timestamp pattern and
    /// `FileRotationError` when a rotating file cannot be opened.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        self.timestamp_format.validate()?;
        let builder = Logger::builder()
            .level(self.level)
            .report_caller(self.report_caller)
            .lock_mode(self.lock_mode);

        let builder = match self.format {
            OutputFormat::Text => builder
                .formatter(TextFormatter::new().timestamp_format(self.timestamp_format.clone())),
            OutputFormat::Json => builder
                .formatter(JsonFormatter::new().timestamp_format(self.timestamp_format.clone())),
        };

        Ok(match &self.output {
            OutputTarget::Stderr => builder.output(std::io::stderr()),
            OutputTarget::Stdout => builder.output(std::io::stdout()),
            OutputTarget::RotatingFile {
                base_path,
                name_template,
                time_format,
                compress,
            } => builder.output(
                RotatingFileWriter::open(base_path, name_template.as_str(), time_format.as_str())?
                    .with_compression(*compress),
            ),
        })
    }

    pub fn build(&self) -> Result<Logger> {
        Ok(self.builder()?.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = LoggerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.output, OutputTarget::Stderr);
    }

    #[test]
    fn test_level_text_round_trips() {
        let config = LoggerConfig {
            level: LogLevel::Warn,
            ..LoggerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"level\":\"warning\""));

        let parsed = LoggerConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let err = LoggerConfig::from_json_str(r#"{"level": "loud"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_invalid_custom_timestamp_rejected_at_build() {
        let config = LoggerConfig::from_json_str(r#"{"timestamp_format": {"Custom": "%Q%"}}"#)
            .unwrap();
        let err = config.build().unwrap_err();
        assert!(matches!(err, LoggerError::FormatterError { .. }));
    }

    #[test]
    fn test_rotating_file_target_builds() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::json!({
            "level": "debug",
            "format": "json",
            "lock_mode": "unsynchronized",
            "output": {
                "type": "rotating_file",
                "base_path": dir.path(),
                "name_template": "svc-${time}.log",
                "time_format": "%Y%m%d"
            }
        });
        let config: LoggerConfig = serde_json::from_value(json).unwrap();
        let logger = config.build().unwrap();
        logger.debug("to file");

        assert_eq!(logger.lock_mode(), LockMode::Unsynchronized);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}

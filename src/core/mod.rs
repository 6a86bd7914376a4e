//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod exit;
pub mod fields;
pub mod hooks;
pub mod lock;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pool;
pub mod timestamp;

pub use caller::{resolve_caller, Caller, MAXIMUM_CALLER_DEPTH};
pub use config::{LoggerConfig, OutputFormat, OutputTarget};
pub use entry::{Context, Entry, ERROR_KEY};
pub use error::{BoxError, LoggerError, PanicEvent, Result};
pub use exit::ExitFunc;
pub use fields::{FieldValue, Fields};
pub use hooks::{FnHook, Hook, LevelHooks};
pub use lock::LockMode;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use pool::{buffer_pool, BufferPool, PooledBuffer, DEFAULT_ENTRY_POOL_CAPACITY};
pub use timestamp::TimestampFormat;

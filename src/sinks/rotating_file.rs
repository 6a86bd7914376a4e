//! Time-stamped log files that rotate when the stamp changes
//!
//! The file name comes from a template containing the `${time}` token,
//! which is replaced by the current local time rendered with a strftime
//! format. The stamp is recomputed before every write; when it changes a
//! new file is opened and the old handle is closed. A format of `%Y%m%d%H%M`
//! therefore rotates every minute, `%Y%m%d` every day.

use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::is_valid_strftime;
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Placeholder replaced by the formatted time in the name template
pub const TIME_TOKEN: &str = "${time}";

/// Source of the local time used for stamps
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// How a rotating file is installed on a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// The rotating file becomes the only sink
    #[default]
    Replace,
    /// Write to the rotating file, then to the previously configured sink
    Tee,
}

/// # Examples
///
/// ```no_run
/// use rust_field_logger::prelude::*;
///
/// let writer = RotatingFileWriter::open("/var/log/app", "app-${time}.log", "%Y%m%d")?;
/// let logger = Logger::new();
/// logger.set_rotating_output(writer, RotationMode::Tee);
/// # Ok::<(), rust_field_logger::LoggerError>(())
/// ```
pub struct RotatingFileWriter {
    base_path: PathBuf,
    name_template: String,
    time_format: String,
    clock: Clock,
    stamp: String,
    current_path: PathBuf,
    file: File,
    compress: bool,
    rotation_count: u64,
}

impl RotatingFileWriter {
    /// Open the file for the current local time.
    ///
    /// # Errors
    ///
    /// Returns `FileRotationError` when the time format is not valid strftime
    /// or the file cannot be created.
    pub fn open(
        base_path: impl AsRef<Path>,
        name_template: impl Into<String>,
        time_format: impl Into<String>,
    ) -> Result<Self> {
        Self::open_with_clock(base_path, name_template, time_format, Arc::new(Local::now))
    }

    /// Like [`RotatingFileWriter::open`] with an injected time source
    pub fn open_with_clock(
        base_path: impl AsRef<Path>,
        name_template: impl Into<String>,
        time_format: impl Into<String>,
        clock: Clock,
    ) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        let name_template = name_template.into();
        let time_format = time_format.into();

        if !is_valid_strftime(&time_format) {
            return Err(LoggerError::file_rotation(
                base_path.display().to_string(),
                format!("invalid time format {:?}", time_format),
            ));
        }

        let stamp = render_stamp(&time_format, &clock()).map_err(|e| {
            LoggerError::file_rotation(base_path.display().to_string(), e.to_string())
        })?;
        let current_path = base_path.join(name_template.replace(TIME_TOKEN, &stamp));
        let file = open_log_file(&current_path).map_err(|e| {
            LoggerError::file_rotation(
                current_path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })?;

        Ok(Self {
            base_path,
            name_template,
            time_format,
            clock,
            stamp,
            current_path,
            file,
            compress: false,
            rotation_count: 0,
        })
    }

    /// Gzip each file once its period has ended
    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File currently receiving writes
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Number of times a new file has been opened since construction
    pub fn rotation_count(&self) -> u64 {
        self.rotation_count
    }

    /// Switch files if the stamp changed.
    ///
    /// On failure the current handle is kept so the next write retries.
    fn rotate_if_needed(&mut self) -> io::Result<()> {
        let stamp = render_stamp(&self.time_format, &(self.clock)())?;
        if stamp == self.stamp {
            return Ok(());
        }

        let path = self
            .base_path
            .join(self.name_template.replace(TIME_TOKEN, &stamp));
        let file = open_log_file(&path)?;

        let _ = self.file.flush();
        self.file = file;
        let previous = std::mem::replace(&mut self.current_path, path);
        self.stamp = stamp;
        self.rotation_count += 1;

        if self.compress && previous != self.current_path {
            if let Err(e) = compress_file(&previous) {
                eprintln!(
                    "[LOGGER WARNING] Failed to compress rotated log {}: {}",
                    previous.display(),
                    e
                );
            }
        }
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.rotate_if_needed()?;
        self.file.write(buf)
    }

    /// One rotation check per buffer, so an entry never spans two files
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.rotate_if_needed()?;
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("current_path", &self.current_path)
            .field("time_format", &self.time_format)
            .field("compress", &self.compress)
            .field("rotation_count", &self.rotation_count)
            .finish_non_exhaustive()
    }
}

fn render_stamp(time_format: &str, now: &DateTime<Local>) -> io::Result<String> {
    let mut stamp = String::new();
    fmt::Write::write_fmt(&mut stamp, format_args!("{}", now.format(time_format))).map_err(
        |_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid time format {:?}", time_format),
            )
        },
    )?;
    Ok(stamp)
}

/// Create parent directories and open for append
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    options.open(path)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Stream `path` into `path.gz` through a temporary file, then remove it
fn compress_file(path: &Path) -> Result<()> {
    let gz_path = with_suffix(path, ".gz");
    let temp_gz_path = with_suffix(path, ".gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!(
                "Failed to create temporary compressed file: {}",
                temp_gz_path.display()
            ),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut writer| writer.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

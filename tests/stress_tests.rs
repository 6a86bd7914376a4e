//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Writes from many threads never interleave within a line
//! - Level changes while logging never block or corrupt output
//! - Hooks observe every event exactly once under contention
//! - Rotation under concurrent writers loses no lines

use chrono::{DateTime, Duration, Local, TimeZone};
use parking_lot::Mutex;
use rust_field_logger::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn json_logger(buffer: &SharedBuffer) -> Logger {
    Logger::builder()
        .level(LogLevel::Debug)
        .formatter(JsonFormatter::new())
        .output(buffer.clone())
        .build()
}

/// Every line written concurrently must be a complete JSON document
#[test]
fn test_concurrent_writes_do_not_interleave() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger
                        .with_fields([("thread", t), ("seq", i)])
                        .info("concurrent message with a reasonably long body");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut seen = HashSet::new();
    for line in &lines {
        let parsed: serde_json::Value =
            serde_json::from_str(line).expect("line is a complete JSON object");
        let key = (parsed["thread"].as_u64().unwrap(), parsed["seq"].as_u64().unwrap());
        assert!(seen.insert(key), "duplicate line {:?}", key);
    }
    assert_eq!(logger.metrics().total_logged(), (THREADS * PER_THREAD) as u64);
    assert_eq!(logger.dropped_count(), 0);
}

/// Flipping the threshold while other threads log never deadlocks
#[test]
fn test_level_changes_during_logging() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.debug(format_args!("debug {}", i));
                    logger.error(format_args!("error {}", i));
                }
            })
        })
        .collect();

    let toggler = {
        let logger = logger.clone();
        thread::spawn(move || {
            for i in 0..1000 {
                let level = if i % 2 == 0 { LogLevel::Error } else { LogLevel::Debug };
                logger.set_level(level);
            }
        })
    };

    for handle in writers {
        handle.join().expect("writer panicked");
    }
    toggler.join().expect("toggler panicked");

    let lines = buffer.lines();
    let errors = lines.iter().filter(|l| l.contains("\"level\":\"error\"")).count();
    assert_eq!(errors, 4 * PER_THREAD, "error level is always enabled");
    for line in &lines {
        serde_json::from_str::<serde_json::Value>(line).expect("complete line");
    }
}

/// Hooks fire once per event regardless of contention
#[test]
fn test_hooks_under_contention() {
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = Arc::clone(&fired);
    let logger = Logger::builder()
        .output(std::io::sink())
        .hook(FnHook::new("count", &[LogLevel::Warn], move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .build();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    logger.warn("watched");
                    logger.info("unwatched");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    assert_eq!(fired.load(Ordering::SeqCst), THREADS * PER_THREAD);
}

/// Rotating while several threads write keeps every line
#[test]
fn test_rotation_with_concurrent_writers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let start = Local
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid local time");
    let now: Arc<Mutex<DateTime<Local>>> = Arc::new(Mutex::new(start));
    let clock_now = Arc::clone(&now);
    let writer = RotatingFileWriter::open_with_clock(
        temp_dir.path(),
        "stress-${time}.log",
        "%H%M",
        Arc::new(move || *clock_now.lock()),
    )
    .expect("Failed to open rotating file");

    let logger = Logger::builder()
        .formatter(TextFormatter::new().disable_timestamp(true))
        .build();
    logger.set_rotating_output(writer, RotationMode::Replace);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            let now = Arc::clone(&now);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    if t == 0 && i % 100 == 0 {
                        *now.lock() += Duration::minutes(1);
                    }
                    logger.with_field("seq", i).info("rotating");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
    logger.flush().expect("flush failed");

    let total: usize = fs::read_dir(temp_dir.path())
        .expect("read temp dir")
        .map(|entry| {
            let path = entry.expect("dir entry").path();
            fs::read_to_string(path).expect("read log").lines().count()
        })
        .sum();
    assert_eq!(total, 4 * PER_THREAD);
}

//! Call-site reporting seen from a downstream crate

use rust_field_logger::core::caller::{logger_package, resolve_caller};
use rust_field_logger::prelude::*;
use std::thread;

fn json_logger(buffer: &SharedBuffer) -> Logger {
    Logger::builder()
        .formatter(JsonFormatter::new())
        .output(buffer.clone())
        .report_caller(true)
        .build()
}

#[inline(never)]
fn log_from_named_function(logger: &Logger) {
    logger.info("from helper");
}

#[test]
fn test_resolver_skips_logger_frames() {
    let caller = resolve_caller().expect("a frame outside the logger");
    assert_ne!(caller.package, logger_package());
    assert!(!caller.function.is_empty());
}

#[test]
fn test_caller_reported_in_output() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);

    log_from_named_function(&logger);

    let parsed: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
    let func = parsed["func"].as_str().expect("func key present");
    assert!(
        func.contains("log_from_named_function"),
        "unexpected caller {}",
        func
    );
    assert!(parsed["file"]
        .as_str()
        .map_or(true, |file| file.contains("caller_tests.rs")));
}

#[test]
fn test_caller_absent_when_disabled() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);
    logger.set_report_caller(false);

    logger.info("no caller");

    let parsed: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
    assert!(parsed.get("func").is_none());
    assert!(parsed.get("file").is_none());
}

#[test]
fn test_user_func_field_prefixed_when_reporting() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);

    logger.with_field("func", "user supplied").info("clash");

    let parsed: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
    assert_eq!(parsed["fields.func"], "user supplied");
    assert_ne!(parsed["func"], "user supplied");
}

#[test]
fn test_concurrent_first_use() {
    let buffer = SharedBuffer::new();
    let logger = json_logger(&buffer);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || logger.info("racing"))
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    for line in buffer.lines() {
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        let func = parsed["func"].as_str().unwrap_or_default();
        assert!(!func.starts_with(logger_package()));
    }
}

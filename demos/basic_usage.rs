//! Basic logger usage example
//!
//! Demonstrates levels, fields and the text and JSON formatters.
//!
//! Run with: cargo run --example basic_usage

use rust_field_logger::prelude::*;
use rust_field_logger::{fields, info, warn};

fn main() -> Result<()> {
    println!("=== Rust Field Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .level(LogLevel::Trace)
        .formatter(TextFormatter::new().colors(true))
        .output(std::io::stdout())
        .build();

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Raising the threshold to warning:");
    logger.set_level("warning".parse()?);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warn("Warning message (visible)");
    logger.set_level(LogLevel::Info);

    println!("\n3. Structured fields:");
    let request = logger.with_fields(fields! { "request_id" => "abc-123", "user" => "alice" });
    info!(request, "Request received");
    info!(request.with_field("latency_ms", 42), "Request completed in {}ms", 42);

    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    logger.with_error(&err).error("Call failed");

    println!("\n4. JSON output with caller reporting:");
    logger.set_formatter(JsonFormatter::new());
    logger.set_report_caller(true);
    warn!(logger.with_field("disk", "/var"), "Disk {}% full", 91);

    println!("\n5. Panic-level events come back as values:");
    if let Err(event) = logger.with_field("order", 17).panic("Inventory corrupted") {
        println!("   recovered event: {} at {}", event, event.entry().level());
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

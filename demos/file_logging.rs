//! File logging example
//!
//! Demonstrates a time-rotated log file teed with the console.
//!
//! Run with: cargo run --example file_logging

use rust_field_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Field Logger - File Logging Example ===\n");

    let logger = Logger::builder().output(std::io::stdout()).build();

    // One file per minute, gzipped once the minute has passed
    let writer = RotatingFileWriter::open("logs", "application-${time}.log", "%Y%m%d%H%M")?
        .with_compression(true);
    println!("Writing to {}", writer.current_path().display());
    logger.set_rotating_output(writer, RotationMode::Tee);

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");
    logger.with_field("plugin", "metrics").error("Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        logger.with_field("item", i).info(format_args!("Processing item {}/5", i));
    }

    println!("\n3. Switching to a config document:");
    let config = LoggerConfig::from_json_str(
        r#"{
            "level": "debug",
            "format": "json",
            "output": {
                "type": "rotating_file",
                "base_path": "logs",
                "name_template": "application-json-${time}.log",
                "time_format": "%Y%m%d"
            }
        }"#,
    )?;
    let json_logger = config.build()?;
    json_logger.debug("Configured from JSON");
    json_logger.flush()?;

    logger.info("All operations completed");
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the output");

    Ok(())
}

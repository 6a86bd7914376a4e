//! Hooks example
//!
//! Demonstrates level hooks, exit handlers and a fatal shutdown.
//!
//! Run with: cargo run --example hooks

use rust_field_logger::prelude::*;
use rust_field_logger::BoxError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counts error-level events and tags them with a sequence number
struct ErrorCounter {
    seen: AtomicU64,
}

impl Hook for ErrorCounter {
    fn levels(&self) -> Vec<LogLevel> {
        vec![LogLevel::Error, LogLevel::Fatal, LogLevel::Panic]
    }

    fn fire(&self, entry: &mut Entry) -> std::result::Result<(), BoxError> {
        let seq = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        entry.data_mut().insert("error_seq".to_string(), FieldValue::from(seq));
        Ok(())
    }

    fn name(&self) -> &str {
        "error_counter"
    }
}

fn main() {
    println!("=== Rust Field Logger - Hooks Example ===\n");

    let counter = Arc::new(ErrorCounter {
        seen: AtomicU64::new(0),
    });

    let logger = Logger::builder()
        .formatter(JsonFormatter::new())
        .output(std::io::stdout())
        .exit_handler(|| println!("exit handler: flushing before shutdown"))
        .exit_func(|code| println!("exit function called with code {}", code))
        .build();
    logger.add_shared_hook(counter.clone());
    logger.add_hook(FnHook::new("audit", &[LogLevel::Warn], |entry| {
        if entry.data().contains_key("user") {
            Ok(())
        } else {
            Err("warning without a user field".into())
        }
    }));

    println!("1. Hooks enrich error events:");
    logger.error("First failure");
    logger.error("Second failure");

    println!("\n2. A failing hook is reported but the entry is still written:");
    logger.warn("Anonymous warning");
    logger.with_field("user", "alice").warn("Attributed warning");

    println!("\n3. Fatal runs exit handlers, then the exit function:");
    logger.fatal("Unrecoverable state");

    println!(
        "\nerrors seen: {}, hook failures: {}",
        counter.seen.load(Ordering::Relaxed),
        logger.metrics().hook_failures()
    );
    println!("\n=== Example completed successfully! ===");
}

//! Property-based tests for rust_field_logger using proptest

use proptest::collection::hash_map;
use proptest::prelude::*;
use rust_field_logger::prelude::*;
use std::collections::HashMap;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
        Just(LogLevel::Error),
        Just(LogLevel::Warn),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
        Just(LogLevel::Trace),
    ]
}

fn field_set() -> impl Strategy<Value = HashMap<String, i64>> {
    hash_map("[a-e]{1,2}", any::<i64>(), 0..8)
}

fn quiet_logger() -> Logger {
    Logger::builder().output(std::io::sink()).build()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Text form parses back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Unknown tokens fail with InvalidLevel
    #[test]
    fn test_unknown_level_rejected(text in "[a-z]{1,10}") {
        let known = ["panic", "fatal", "error", "warn", "warning", "info", "debug", "trace"];
        prop_assume!(!known.contains(&text.as_str()));
        let is_invalid_level = matches!(
            text.parse::<LogLevel>(),
            Err(LoggerError::InvalidLevel { .. })
        );
        prop_assert!(is_invalid_level);
    }

    /// Enabling is monotonic: a level passes every threshold at or above it
    #[test]
    fn test_threshold_consistent_with_order(level in any_level(), threshold in any_level()) {
        prop_assert_eq!(level.is_enabled_at(threshold), level.as_u8() <= threshold.as_u8());
    }
}

// ============================================================================
// Entry Tests
// ============================================================================

proptest! {
    /// Merging keeps the union with later fields winning, and leaves the
    /// receiver untouched
    #[test]
    fn test_with_fields_union_and_copy_on_write(f1 in field_set(), f2 in field_set()) {
        let logger = quiet_logger();
        let base = Entry::new(&logger).with_fields(f1.clone());
        let merged = base.with_fields(f2.clone());

        let mut expected = f1.clone();
        expected.extend(f2.clone());

        prop_assert_eq!(merged.data().len(), expected.len());
        for (key, value) in &expected {
            prop_assert_eq!(merged.data().get(key), Some(&FieldValue::Int(*value)));
        }
        prop_assert_eq!(base.data().len(), f1.len());
        for (key, value) in &f1 {
            prop_assert_eq!(base.data().get(key), Some(&FieldValue::Int(*value)));
        }
    }

    /// Callables never reach the field map and always leave a note
    #[test]
    fn test_callable_never_stored(key in "[a-z_]{1,12}", others in field_set()) {
        let logger = quiet_logger();
        let callback = |x: u32| x * 2;
        let entry = Entry::new(&logger)
            .with_fields(others.clone())
            .with_field(key.clone(), FieldValue::function(&callback));

        let note = entry.field_error().unwrap_or_default().to_string();
        let quoted_key = format!("{:?}", key);
        prop_assert!(note.contains(&quoted_key));
        match others.get(&key) {
            Some(value) => prop_assert_eq!(entry.data().get(&key), Some(&FieldValue::Int(*value))),
            None => prop_assert!(!entry.data().contains_key(&key)),
        }
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Arbitrary messages and values never break the one-line framing
    #[test]
    fn test_text_output_is_single_line(message in ".*", value in ".*") {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder().output(buffer.clone()).build();
        logger.with_field("value", value).info(message);

        let contents = buffer.contents();
        prop_assert!(contents.ends_with('\n'));
        prop_assert_eq!(contents.matches('\n').count(), 1);
    }

    /// JSON lines always parse and carry the message verbatim
    #[test]
    fn test_json_output_parses(message in ".*", fields in field_set(), level in any_level()) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .level(LogLevel::Trace)
            .formatter(JsonFormatter::new())
            .output(buffer.clone())
            .build();

        let _ = logger.with_fields(fields).log(level, None, &message);

        let line = buffer.lines().pop().unwrap_or_default();
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["message"].as_str(), Some(message.as_str()));
        prop_assert_eq!(parsed["level"].as_str(), Some(level.as_str()));
    }
}

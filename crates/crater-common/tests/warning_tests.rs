//! Tests for the de-duplicating warning channel.

use crater_common::warning::{recorded_warnings, warn_once, was_warned};

#[test]
fn test_warn_once_records_message() {
    warn_once("Test", "recorded message");
    assert!(was_warned("Test", "recorded message"));
    assert!(!was_warned("Test", "never emitted"));
}

#[test]
fn test_warn_once_deduplicates() {
    warn_once("Dedup", "same text");
    warn_once("Dedup", "same text");
    let count = recorded_warnings()
        .iter()
        .filter(|w| w.as_str() == "[Dedup] same text")
        .count();
    assert_eq!(count, 1, "a repeated warning must be stored once");
}

#[test]
fn test_component_is_part_of_key() {
    warn_once("Alpha", "shared message");
    warn_once("Beta", "shared message");
    assert!(was_warned("Alpha", "shared message"));
    assert!(was_warned("Beta", "shared message"));
}

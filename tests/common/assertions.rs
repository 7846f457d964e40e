//! Custom assertions for redaction testing.

use pii_redactor::RedactionResult;

/// Asserts that `sensitive` no longer appears in the redacted text.
///
/// # Panics
/// Panics if the value is still present.
pub fn assert_redacted(result: &RedactionResult, sensitive: &str) {
    assert!(
        !result.redacted_text.contains(sensitive),
        "'{}' should be redacted but was found in output:\n{}",
        sensitive,
        result.redacted_text
    );
}

/// Asserts that `expected` survived redaction.
///
/// # Panics
/// Panics if the value is missing.
pub fn assert_preserved(result: &RedactionResult, expected: &str) {
    assert!(
        result.redacted_text.contains(expected),
        "'{}' should be preserved but was not found in output:\n{}",
        expected,
        result.redacted_text
    );
}

/// Asserts both the output text and the count.
pub fn assert_result(result: &RedactionResult, text: &str, count: usize) {
    assert_eq!(result.redacted_text, text, "unexpected redacted text");
    assert_eq!(
        result.redaction_count, count,
        "unexpected redaction count for output '{}'",
        result.redacted_text
    );
}

//! Detected spans and character/byte offset conversion.
//!
//! All public offsets are character offsets. Rust strings are indexed by
//! byte, so conversion happens at the edges, right before slicing.

use serde::Serialize;

use super::RedactionCategory;

/// Which detector produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanSource {
    Pattern,
    Model,
}

/// A half-open `[start, end)` character range flagged by a detector.
///
/// Offsets are relative to the text as it stood when the detector ran.
/// Pattern spans from different rules, and pattern spans versus model spans,
/// therefore live in different offset spaces and must not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedSpan {
    pub start: usize,
    pub end: usize,
    pub category: RedactionCategory,
    pub source: SpanSource,
    pub matched_text: String,
}

impl DetectedSpan {
    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True when the two ranges share at least one character.
    pub fn overlaps(&self, other: &DetectedSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Maps a character offset to a byte offset.
///
/// Returns `None` when `char_offset` is past the end of `text`.
/// An offset equal to the character length maps to `text.len()`.
pub fn char_to_byte(text: &str, char_offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

/// Maps a byte offset (on a char boundary) to a character offset.
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

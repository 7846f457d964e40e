//! Domain types shared by the detectors and the resolver.
//!
//! - [`RedactionCategory`]: closed set of categories and their tokens
//! - [`RedactionRule`]: one ordered regex rule
//! - [`DetectedSpan`]: a flagged character range

pub mod category;
pub mod rules;
pub mod span;

pub use category::{RedactionCategory, UnknownCategory};
pub use rules::{default_rules, RedactionRule};
pub use span::{byte_to_char, char_len, char_to_byte, DetectedSpan, SpanSource};

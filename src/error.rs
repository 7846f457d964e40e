//! Error types for the redaction engine.
//!
//! Errors fall into three groups: configuration problems that are fatal at
//! load time (`InvalidRule`, `Configuration`), detection failures that are
//! surfaced per call (`RecognitionUnavailable`, `RecognitionFailed`,
//! `InvalidSpan`), and plain I/O.
//!
//! Finding nothing to redact is not an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::RedactionCategory;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// A rule's regular expression failed to compile.
    #[error("Invalid pattern for {category} rule '{pattern}': {reason}")]
    InvalidRule {
        category: RedactionCategory,
        pattern: String,
        reason: String,
    },

    /// Invalid configuration value or category mapping.
    #[error("Configuration error for '{parameter}': {reason}")]
    Configuration { parameter: String, reason: String },

    /// The entity-recognition model could not be loaded or reached.
    #[error("Recognition model '{model}' unavailable: {reason}")]
    RecognitionUnavailable { model: String, reason: String },

    /// The model was loaded but analysis of a text failed.
    #[error("Recognition failed for model '{model}': {reason}")]
    RecognitionFailed { model: String, reason: String },

    /// The model returned a span outside the analyzed text.
    #[error("Invalid span [{start}, {end}) for '{matched_text}' in text of {len} characters")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
        matched_text: String,
    },

    /// An ingestion record could not be parsed.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// Error occurred while reading or writing files.
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RedactorError {
    /// Shorthand for a `Configuration` error.
    pub fn config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that are fatal at startup rather than per call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidRule { .. } | Self::Configuration { .. })
    }

    /// Returns true when the entity pass could not complete.
    ///
    /// Callers use this to tell "regex-only redacted" apart from success.
    pub fn is_recognition(&self) -> bool {
        matches!(
            self,
            Self::RecognitionUnavailable { .. }
                | Self::RecognitionFailed { .. }
                | Self::InvalidSpan { .. }
        )
    }
}

impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        Self::config("config", err.message().to_string())
    }
}

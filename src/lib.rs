//! Two-pass redaction of personal and financial identifiers in free text.
//!
//! Structurally regular identifiers (account numbers, SSNs, SWIFT and IBAN
//! codes, email addresses) are caught by an ordered list of regex rules.
//! Names, organizations, places and amounts are caught by an entity
//! recognition model run over the already pattern-redacted text.
//!
//! # Architecture
//!
//! - [`domain`]: categories, rules, spans
//! - [`detection`]: the pattern matcher and the entity recognizer capability
//! - [`redaction`]: span resolution and the [`RedactionEngine`] facade
//! - [`config`]: TOML engine configuration
//! - [`records`]: batch redaction of crawled page records
//! - [`error`]: error taxonomy
//!
//! # Quick Start
//!
//! ```
//! use pii_redactor::{GazetteerRecognizer, RedactionEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = GazetteerRecognizer::from_entries("people", [("PERSON", "John Smith")])?;
//! let engine = RedactionEngine::builder().recognizer(model).build()?;
//!
//! let result = engine.redact("John Smith's SSN is 123-45-6789, email john@bank.com")?;
//! assert_eq!(
//!     result.redacted_text,
//!     "[REDACTED_Person]'s SSN is [REDACTED_SSN], email [REDACTED_EMAIL]"
//! );
//! assert_eq!(result.redaction_count, 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Pattern rules only
//!
//! ```
//! use pii_redactor::PatternMatcher;
//!
//! let pass = PatternMatcher::default().apply("contact me at a.b@example.com today");
//! assert_eq!(pass.text, "contact me at [REDACTED_EMAIL] today");
//! assert_eq!(pass.count, 1);
//! ```

pub mod config;
pub mod detection;
pub mod domain;
pub mod error;
pub mod records;
pub mod redaction;

pub use config::{EngineConfig, RecognizerConfig, RecognizerKind, RuleConfig};
pub use detection::{
    Entity, EntityRecognizer, GazetteerProvider, GazetteerRecognizer, LabelMap, PatternMatcher,
    PatternPass, RecognitionProvider, RemoteProvider, RemoteRecognizer,
};
pub use domain::{default_rules, DetectedSpan, RedactionCategory, RedactionRule, SpanSource};
pub use error::{RedactorError, RedactorResult};
pub use redaction::{
    Detection, EngineBuilder, ModelHandle, RedactionEngine, RedactionResult, SpanResolver,
    SubstitutionMode,
};

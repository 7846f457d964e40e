//! The two detectors.
//!
//! - [`pattern`]: deterministic regex rules, run first on the raw text
//! - [`entity`]: the model capability the second pass is written against
//! - [`gazetteer`], [`remote`]: concrete recognizers

pub mod entity;
pub mod gazetteer;
pub mod pattern;
pub mod remote;

pub use entity::{Entity, EntityRecognizer, LabelMap, RecognitionProvider};
pub use gazetteer::{GazetteerProvider, GazetteerRecognizer};
pub use pattern::{PatternMatcher, PatternPass};
pub use remote::{RemoteProvider, RemoteRecognizer};

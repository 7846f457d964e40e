//! Entity-pass resolution and the engine facade.
//!
//! [`RedactionEngine`] is the entry point: it runs the pattern pass, hands
//! the result to the model, and lets [`SpanResolver`] write the entities
//! back. [`ModelHandle`] guards the one-time model load.

pub mod engine;
pub mod model;
pub mod resolver;

pub use engine::{Detection, EngineBuilder, RedactionEngine, RedactionResult};
pub use model::ModelHandle;
pub use resolver::{ResolvedPass, SpanResolver, SubstitutionMode};

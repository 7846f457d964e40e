//! Redaction engine facade.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::model::ModelHandle;
use super::resolver::{SpanResolver, SubstitutionMode};
use crate::detection::{
    EntityRecognizer, LabelMap, PatternMatcher, PatternPass, RecognitionProvider,
};
use crate::domain::{default_rules, DetectedSpan, RedactionRule};
use crate::error::{RedactorError, RedactorResult};

/// Outcome of a successful redaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedactionResult {
    pub redacted_text: String,
    /// Substitutions performed, counted as described on [`RedactionEngine::redact`].
    pub redaction_count: usize,
}

impl RedactionResult {
    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.redaction_count > 0
    }
}

/// Redaction result plus every span each pass acted on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Detection {
    pub result: RedactionResult,
    /// Offsets relative to the text each rule ran against.
    pub pattern_spans: Vec<DetectedSpan>,
    /// Offsets relative to the post-pattern text.
    pub entity_spans: Vec<DetectedSpan>,
}

/// Two-pass redaction: ordered pattern rules, then entity recognition.
///
/// The passes are strictly ordered. The model only ever sees text in which
/// pattern matches are already opaque tokens, so the two detectors never
/// need overlap arbitration, and pattern offsets are never reused in the
/// entity pass.
///
/// The engine is `Send + Sync` and holds no per-call state; share one
/// instance across worker threads.
#[derive(Debug)]
pub struct RedactionEngine {
    matcher: PatternMatcher,
    resolver: SpanResolver,
    model: ModelHandle,
}

impl RedactionEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn resolver(&self) -> &SpanResolver {
        &self.resolver
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Redacts `text`.
    ///
    /// The count is one per pattern match plus, for the entity pass, one per
    /// replaced span in [`SubstitutionMode::Offset`] or one per retained
    /// entity in [`SubstitutionMode::Literal`].
    ///
    /// Fails if the model cannot be loaded or analysis fails; the pattern
    /// pass result is never returned on its own from here.
    pub fn redact(&self, text: &str) -> RedactorResult<RedactionResult> {
        self.detect(text).map(|detection| detection.result)
    }

    /// Like [`redact`](Self::redact) but also returns the spans.
    pub fn detect(&self, text: &str) -> RedactorResult<Detection> {
        let recognizer = self.model.get()?;
        let patterns = self.matcher.apply(text);

        let entities = recognizer.analyze(&patterns.text)?;
        let resolved = self.resolver.resolve(&patterns.text, &entities)?;

        debug!(
            pattern_redactions = patterns.count,
            entity_redactions = resolved.count,
            entities = entities.len(),
            "Redacted text"
        );

        Ok(Detection {
            result: RedactionResult {
                redacted_text: resolved.text,
                redaction_count: patterns.count + resolved.count,
            },
            pattern_spans: patterns.spans,
            entity_spans: resolved.spans,
        })
    }

    /// The pattern pass alone, for callers that explicitly accept
    /// regex-only redaction.
    pub fn pattern_pass(&self, text: &str) -> PatternPass {
        self.matcher.apply(text)
    }

    /// Loads the model now instead of on first use.
    pub fn warm_up(&self) -> RedactorResult<()> {
        self.model.get().map(|_| ())
    }
}

/// Builder for [`RedactionEngine`].
///
/// Defaults: built-in rules, default label map, offset substitution. A model
/// source is required.
#[derive(Default)]
pub struct EngineBuilder {
    rules: Option<Vec<RedactionRule>>,
    labels: Option<LabelMap>,
    mode: SubstitutionMode,
    model: Option<ModelHandle>,
}

impl EngineBuilder {
    /// Replaces the ordered rule list.
    pub fn rules(mut self, rules: Vec<RedactionRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn labels(mut self, labels: LabelMap) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn substitution(mut self, mode: SubstitutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Uses a recognizer that is already loaded.
    pub fn recognizer<R: EntityRecognizer + 'static>(mut self, recognizer: R) -> Self {
        self.model = Some(ModelHandle::preloaded(Box::new(recognizer)));
        self
    }

    /// Loads `model_id` through `provider` on first use.
    pub fn provider(
        mut self,
        provider: Arc<dyn RecognitionProvider>,
        model_id: impl Into<String>,
    ) -> Self {
        self.model = Some(ModelHandle::lazy(provider, model_id));
        self
    }

    pub fn model(mut self, model: ModelHandle) -> Self {
        self.model = Some(model);
        self
    }

    pub fn build(self) -> RedactorResult<RedactionEngine> {
        let model = self
            .model
            .ok_or_else(|| RedactorError::config("recognizer", "no entity recognizer configured"))?;

        Ok(RedactionEngine {
            matcher: PatternMatcher::new(self.rules.unwrap_or_else(default_rules)),
            resolver: SpanResolver::new(self.labels.unwrap_or_default(), self.mode),
            model,
        })
    }
}

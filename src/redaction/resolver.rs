//! Entity pass: reconciles model output against the post-pattern text.
//!
//! Two substitution modes exist:
//!
//! - [`SubstitutionMode::Offset`] replaces exactly the reported character
//!   ranges, right to left. Overlapping or repeated spans are collapsed
//!   first, and the count is the number of ranges replaced.
//! - [`SubstitutionMode::Literal`] replaces every occurrence of each
//!   entity's literal text anywhere in the document and counts once per
//!   retained entity. This over-redacts unrelated text that shares the
//!   substring, and an entity whose text was already consumed by an earlier
//!   replacement is still counted even though nothing changes.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, warn};

use crate::detection::{Entity, LabelMap};
use crate::domain::{char_len, char_to_byte, DetectedSpan, RedactionCategory, SpanSource};
use crate::error::{RedactorError, RedactorResult};

/// How model entities are written back into the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionMode {
    /// Replace recorded character ranges.
    #[default]
    Offset,
    /// Replace every occurrence of the entity text, counting per entity.
    Literal,
}

/// Output of the entity pass.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPass {
    pub text: String,
    pub count: usize,
    /// Retained spans, in offsets of the text the model analyzed.
    pub spans: Vec<DetectedSpan>,
}

/// Applies retained entities to a text buffer.
#[derive(Debug, Clone, Default)]
pub struct SpanResolver {
    labels: LabelMap,
    mode: SubstitutionMode,
}

impl SpanResolver {
    pub fn new(labels: LabelMap, mode: SubstitutionMode) -> Self {
        Self { labels, mode }
    }

    pub fn mode(&self) -> SubstitutionMode {
        self.mode
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Applies `entities`, which must have been produced from `text`.
    pub fn resolve(&self, text: &str, entities: &[Entity]) -> RedactorResult<ResolvedPass> {
        match self.mode {
            SubstitutionMode::Offset => self.resolve_offsets(text, entities),
            SubstitutionMode::Literal => Ok(self.resolve_literal(text, entities)),
        }
    }

    fn retained<'a>(
        &'a self,
        entities: &'a [Entity],
    ) -> impl Iterator<Item = (RedactionCategory, &'a Entity)> + 'a {
        entities.iter().filter_map(|entity| {
            let category = self.labels.category_for(&entity.label);
            if category.is_none() {
                debug!(label = %entity.label, "Ignoring entity outside allow-list");
            }
            category.map(|c| (c, entity))
        })
    }

    fn resolve_offsets(&self, text: &str, entities: &[Entity]) -> RedactorResult<ResolvedPass> {
        let len = char_len(text);
        let mut candidates = Vec::new();

        for (category, entity) in self.retained(entities) {
            let invalid = || RedactorError::InvalidSpan {
                start: entity.start,
                end: entity.end,
                len,
                matched_text: entity.text.clone(),
            };
            if entity.start >= entity.end || entity.end > len {
                return Err(invalid());
            }
            let start_byte = char_to_byte(text, entity.start).ok_or_else(invalid)?;
            let end_byte = char_to_byte(text, entity.end).ok_or_else(invalid)?;
            let covered = &text[start_byte..end_byte];
            if covered != entity.text {
                debug!(
                    reported = %entity.text,
                    covered = %covered,
                    "Entity text differs from its span; using the span"
                );
            }
            candidates.push((
                start_byte..end_byte,
                DetectedSpan {
                    start: entity.start,
                    end: entity.end,
                    category,
                    source: SpanSource::Model,
                    matched_text: covered.to_string(),
                },
            ));
        }

        // Earliest first, longest first on ties; anything overlapping a
        // kept span is dropped.
        candidates.sort_by_key(|(_, span)| (span.start, Reverse(span.end)));
        let mut kept: Vec<(std::ops::Range<usize>, DetectedSpan)> = Vec::new();
        for (bytes, span) in candidates {
            if let Some((_, previous)) = kept.last() {
                if span.overlaps(previous) {
                    if span != *previous {
                        warn!(
                            start = span.start,
                            end = span.end,
                            kept_start = previous.start,
                            kept_end = previous.end,
                            "Dropping entity span overlapping an earlier one"
                        );
                    }
                    continue;
                }
            }
            kept.push((bytes, span));
        }

        let mut output = text.to_string();
        for (bytes, span) in kept.iter().rev() {
            output.replace_range(bytes.clone(), &span.category.token());
        }

        Ok(ResolvedPass {
            text: output,
            count: kept.len(),
            spans: kept.into_iter().map(|(_, span)| span).collect(),
        })
    }

    fn resolve_literal(&self, text: &str, entities: &[Entity]) -> ResolvedPass {
        let len = char_len(text);
        let mut output = text.to_string();
        let mut count = 0;
        let mut spans = Vec::new();

        for (category, entity) in self.retained(entities) {
            if entity.text.is_empty() {
                debug!(label = %entity.label, "Skipping entity with empty text");
                continue;
            }

            count += 1;
            let occurrences = output.matches(entity.text.as_str()).count();
            if occurrences == 0 {
                debug!(text = %entity.text, "Entity counted but no occurrence left to replace");
            } else {
                output = output.replace(entity.text.as_str(), &category.token());
            }

            if entity.start < entity.end && entity.end <= len {
                spans.push(DetectedSpan {
                    start: entity.start,
                    end: entity.end,
                    category,
                    source: SpanSource::Model,
                    matched_text: entity.text.clone(),
                });
            }
        }

        ResolvedPass {
            text: output,
            count,
            spans,
        }
    }
}

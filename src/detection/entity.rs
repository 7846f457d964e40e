//! Entity recognition capability.
//!
//! The engine treats a recognition model as an opaque capability: given
//! text, return labelled spans. Any type implementing [`EntityRecognizer`]
//! can back the entity pass, and a [`RecognitionProvider`] loads one from a
//! model identifier.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::RedactionCategory;
use crate::error::{RedactorError, RedactorResult};

/// One entity as reported by a model.
///
/// Offsets are character offsets into the analyzed text. Models are not
/// required to return sorted, non-overlapping, or exact spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

impl Entity {
    pub fn new(
        start: usize,
        end: usize,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            text: text.into(),
        }
    }
}

/// A loaded model.
pub trait EntityRecognizer: Send + Sync {
    /// Returns the entities found in `text`.
    fn analyze(&self, text: &str) -> RedactorResult<Vec<Entity>>;

    /// Model identifier, for logs and errors.
    fn model_id(&self) -> &str;
}

/// Loads a recognizer by identifier.
pub trait RecognitionProvider: Send + Sync {
    fn load(&self, model_id: &str) -> RedactorResult<Box<dyn EntityRecognizer>>;
}

/// Maps model labels to redaction categories, restricted to an allow-list.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: BTreeMap<String, RedactionCategory>,
    allowed: BTreeSet<RedactionCategory>,
}

impl LabelMap {
    /// Builds a map; every target category and every allowed category must
    /// be an entity category.
    pub fn new(
        labels: impl IntoIterator<Item = (String, RedactionCategory)>,
        allowed: impl IntoIterator<Item = RedactionCategory>,
    ) -> RedactorResult<Self> {
        let labels: BTreeMap<_, _> = labels.into_iter().collect();
        let allowed: BTreeSet<_> = allowed.into_iter().collect();

        if let Some((label, category)) = labels.iter().find(|(_, c)| !c.is_entity()) {
            return Err(RedactorError::config(
                format!("entity_labels.{}", label),
                format!("{} is a pattern category, not an entity category", category),
            ));
        }
        if let Some(category) = allowed.iter().find(|c| !c.is_entity()) {
            return Err(RedactorError::config(
                "allowed_entity_categories",
                format!("{} is a pattern category, not an entity category", category),
            ));
        }

        Ok(Self { labels, allowed })
    }

    /// Adds or replaces a label mapping.
    pub fn with_label(
        mut self,
        label: impl Into<String>,
        category: RedactionCategory,
    ) -> RedactorResult<Self> {
        let label = label.into();
        if !category.is_entity() {
            return Err(RedactorError::config(
                format!("entity_labels.{}", label),
                format!("{} is a pattern category, not an entity category", category),
            ));
        }
        self.labels.insert(label, category);
        Ok(self)
    }

    /// Restricts the allow-list.
    pub fn with_allowed(
        self,
        allowed: impl IntoIterator<Item = RedactionCategory>,
    ) -> RedactorResult<Self> {
        Self::new(self.labels, allowed)
    }

    /// Category for a model label, or `None` if the entity must be ignored.
    ///
    /// Explicit mappings win; otherwise a label that names an entity
    /// category (`Person`, `money`) maps to it.
    pub fn category_for(&self, label: &str) -> Option<RedactionCategory> {
        let category = match self.labels.get(label) {
            Some(category) => *category,
            None => label.parse::<RedactionCategory>().ok()?,
        };
        (category.is_entity() && self.allowed.contains(&category)).then_some(category)
    }

    pub fn allowed(&self) -> impl Iterator<Item = RedactionCategory> + '_ {
        self.allowed.iter().copied()
    }
}

impl Default for LabelMap {
    /// `PERSON`, `GPE`, `ORG`, `LOC`, `MONEY`, with all entity categories allowed.
    fn default() -> Self {
        let labels = [
            ("PERSON", RedactionCategory::Person),
            ("GPE", RedactionCategory::Place),
            ("ORG", RedactionCategory::Organization),
            ("LOC", RedactionCategory::Location),
            ("MONEY", RedactionCategory::Money),
        ]
        .into_iter()
        .map(|(label, category)| (label.to_string(), category))
        .collect();

        Self {
            labels,
            allowed: RedactionCategory::ENTITY.into_iter().collect(),
        }
    }
}

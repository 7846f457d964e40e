//! Dictionary-driven entity recognizer.
//!
//! A gazetteer is a plain text file of `LABEL phrase` lines:
//!
//! ```text
//! # people
//! PERSON  Jane Doe
//! ORG     First National Bank
//! GPE     Minneapolis
//! ```
//!
//! Matching is case-sensitive and whole-word, and the longest phrase wins
//! when several start at the same position. It needs no model runtime, which
//! makes it the offline fallback and a deterministic stand-in for tests.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::entity::{Entity, EntityRecognizer, RecognitionProvider};
use crate::domain::byte_to_char;
use crate::error::{RedactorError, RedactorResult};

/// Recognizer backed by a fixed phrase list.
#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    model_id: String,
    matcher: Option<Regex>,
    labels: HashMap<String, String>,
}

impl GazetteerRecognizer {
    /// Builds a recognizer from `(label, phrase)` pairs.
    ///
    /// A phrase listed twice keeps its last label.
    pub fn from_entries<I, L, P>(model_id: impl Into<String>, entries: I) -> RedactorResult<Self>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: Into<String>,
    {
        let model_id = model_id.into();
        let labels: HashMap<String, String> = entries
            .into_iter()
            .map(|(label, phrase)| (phrase.into(), label.into()))
            .filter(|(phrase, _)| !phrase.trim().is_empty())
            .collect();

        let mut phrases: Vec<&String> = labels.keys().collect();
        phrases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let matcher = if phrases.is_empty() {
            None
        } else {
            let alternation = phrases
                .iter()
                .map(|p| Self::phrase_pattern(p))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("(?:{})", alternation)).map_err(|e| {
                RedactorError::RecognitionUnavailable {
                    model: model_id.clone(),
                    reason: format!("gazetteer does not compile: {}", e),
                }
            })?;
            Some(regex)
        };

        Ok(Self {
            model_id,
            matcher,
            labels,
        })
    }

    /// Parses gazetteer file contents.
    pub fn parse(model_id: impl Into<String>, contents: &str) -> RedactorResult<Self> {
        let model_id = model_id.into();
        let mut entries = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(char::is_whitespace) {
                Some((label, phrase)) if !phrase.trim().is_empty() => {
                    entries.push((label.to_string(), phrase.trim().to_string()));
                }
                _ => {
                    return Err(RedactorError::RecognitionUnavailable {
                        model: model_id,
                        reason: format!("line {}: expected 'LABEL phrase'", idx + 1),
                    });
                }
            }
        }

        Self::from_entries(model_id, entries)
    }

    /// Reads and parses a gazetteer file; the path doubles as the model id.
    pub fn load(path: &Path) -> RedactorResult<Self> {
        let model_id = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RedactorError::RecognitionUnavailable {
                model: model_id.clone(),
                reason: e.to_string(),
            }
        })?;
        let recognizer = Self::parse(model_id, &contents)?;
        info!(
            model = %recognizer.model_id,
            phrases = recognizer.labels.len(),
            "Loaded gazetteer"
        );
        Ok(recognizer)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    // Word boundaries only where the phrase edge is a word character, so
    // phrases like "$5 million" still match.
    fn phrase_pattern(phrase: &str) -> String {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let lead = if phrase.chars().next().is_some_and(is_word) { r"\b" } else { "" };
        let trail = if phrase.chars().last().is_some_and(is_word) { r"\b" } else { "" };
        format!("{}{}{}", lead, regex::escape(phrase), trail)
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn analyze(&self, text: &str) -> RedactorResult<Vec<Entity>> {
        let Some(matcher) = &self.matcher else {
            return Ok(Vec::new());
        };

        let mut entities = Vec::new();
        let mut last = 0;
        let mut last_char = 0;

        for m in matcher.find_iter(text) {
            let Some(label) = self.labels.get(m.as_str()) else {
                continue;
            };
            let start = last_char + byte_to_char(&text[last..], m.start() - last);
            let end = start + m.as_str().chars().count();
            entities.push(Entity::new(start, end, label.clone(), m.as_str()));
            last = m.end();
            last_char = end;
        }

        Ok(entities)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Loads gazetteers from disk; the model identifier is the file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GazetteerProvider;

impl RecognitionProvider for GazetteerProvider {
    fn load(&self, model_id: &str) -> RedactorResult<Box<dyn EntityRecognizer>> {
        Ok(Box::new(GazetteerRecognizer::load(Path::new(model_id))?))
    }
}

//! Test fixtures: deterministic recognizers and on-disk gazetteers.

use anyhow::Result;
use pii_redactor::{
    Entity, EntityRecognizer, RecognitionProvider, RedactionEngine, RedactorError,
    RedactorResult, SubstitutionMode,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Recognizer that "finds" a fixed list of phrases.
///
/// By default each phrase yields one entity at its first occurrence, the
/// way a model reports a single mention. `every_occurrence` reports each
/// mention separately.
#[derive(Debug, Clone, Default)]
pub struct StubRecognizer {
    phrases: Vec<(String, String)>,
    every_occurrence: bool,
}

impl StubRecognizer {
    pub fn new<I, P, L>(phrases: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|(phrase, label)| (phrase.into(), label.into()))
                .collect(),
            every_occurrence: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn every_occurrence(mut self) -> Self {
        self.every_occurrence = true;
        self
    }
}

impl EntityRecognizer for StubRecognizer {
    fn analyze(&self, text: &str) -> RedactorResult<Vec<Entity>> {
        let mut entities = Vec::new();
        for (phrase, label) in &self.phrases {
            for (byte, _) in text.match_indices(phrase.as_str()) {
                let start = text[..byte].chars().count();
                let end = start + phrase.chars().count();
                entities.push(Entity::new(start, end, label.clone(), phrase.clone()));
                if !self.every_occurrence {
                    break;
                }
            }
        }
        Ok(entities)
    }

    fn model_id(&self) -> &str {
        "stub"
    }
}

/// Recognizer that returns exactly the entities it was given.
#[derive(Debug, Clone)]
pub struct FixedRecognizer(pub Vec<Entity>);

impl EntityRecognizer for FixedRecognizer {
    fn analyze(&self, _text: &str) -> RedactorResult<Vec<Entity>> {
        Ok(self.0.clone())
    }

    fn model_id(&self) -> &str {
        "fixed"
    }
}

/// Recognizer whose analysis always fails.
#[derive(Debug, Clone, Copy)]
pub struct BrokenRecognizer;

impl EntityRecognizer for BrokenRecognizer {
    fn analyze(&self, _text: &str) -> RedactorResult<Vec<Entity>> {
        Err(RedactorError::RecognitionFailed {
            model: "broken".to_string(),
            reason: "inference crashed".to_string(),
        })
    }

    fn model_id(&self) -> &str {
        "broken"
    }
}

/// Provider that cannot load anything.
#[derive(Debug, Clone, Copy)]
pub struct UnreachableProvider;

impl RecognitionProvider for UnreachableProvider {
    fn load(&self, model_id: &str) -> RedactorResult<Box<dyn EntityRecognizer>> {
        Err(RedactorError::RecognitionUnavailable {
            model: model_id.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// Provider that counts loads and hands out a stub.
#[derive(Debug)]
pub struct CountingProvider {
    pub loads: AtomicUsize,
    stub: StubRecognizer,
}

impl CountingProvider {
    pub fn new(stub: StubRecognizer) -> Arc<Self> {
        Arc::new(Self {
            loads: AtomicUsize::new(0),
            stub,
        })
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RecognitionProvider for CountingProvider {
    fn load(&self, _model_id: &str) -> RedactorResult<Box<dyn EntityRecognizer>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // Widen the window for racing first callers.
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(Box::new(self.stub.clone()))
    }
}

/// Engine over `recognizer` with default rules and labels.
pub fn engine_with<R: EntityRecognizer + 'static>(recognizer: R) -> RedactionEngine {
    RedactionEngine::builder()
        .recognizer(recognizer)
        .build()
        .expect("engine builds")
}

/// Engine over `recognizer` in literal-substitution mode.
pub fn literal_engine_with<R: EntityRecognizer + 'static>(recognizer: R) -> RedactionEngine {
    RedactionEngine::builder()
        .recognizer(recognizer)
        .substitution(SubstitutionMode::Literal)
        .build()
        .expect("engine builds")
}

/// Sample gazetteer covering every default label.
pub const SAMPLE_GAZETTEER: &str = "\
# sample gazetteer
PERSON  John Smith
PERSON  Jane Doe
ORG     First National Bank
GPE     Minneapolis
LOC     Lake Superior
MONEY   $2,500
DATE    March 3rd
";

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

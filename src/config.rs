//! Engine configuration file.
//!
//! ```toml
//! substitution = "offset"
//! allowed_entity_categories = ["Person", "Organization", "Money"]
//!
//! [entity_labels]
//! NORP = "Organization"
//!
//! [recognizer]
//! kind = "remote"
//! endpoint = "http://localhost:8000"
//! model = "en_core_web_lg"
//!
//! [[rules]]
//! category = "SSN"
//! pattern = '\b\d{3}-\d{2}-\d{4}\b'
//! ```
//!
//! Omitting `rules` selects the built-in rule list. All validation happens
//! in [`EngineConfig::engine`], so a bad file fails at startup.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::detection::{GazetteerProvider, LabelMap, RecognitionProvider, RemoteProvider};
use crate::domain::{default_rules, RedactionCategory, RedactionRule};
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::{EngineBuilder, ModelHandle, RedactionEngine, SubstitutionMode};

/// One `[[rules]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub category: RedactionCategory,
    pub pattern: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl RuleConfig {
    pub fn compile(&self) -> RedactorResult<RedactionRule> {
        let rule = RedactionRule::new(self.category, &self.pattern)?;
        Ok(match &self.token {
            Some(token) => rule.with_token(token.clone()),
            None => rule,
        })
    }
}

/// Where the entity model comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    Gazetteer,
    Remote,
}

/// `[recognizer]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecognizerConfig {
    pub kind: RecognizerKind,
    /// Gazetteer path, or model name on the remote service.
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RecognizerConfig {
    pub fn gazetteer(path: impl Into<String>) -> Self {
        Self {
            kind: RecognizerKind::Gazetteer,
            model: path.into(),
            endpoint: None,
            timeout_secs: None,
        }
    }

    pub fn remote(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            kind: RecognizerKind::Remote,
            model: model.into(),
            endpoint: Some(endpoint.into()),
            timeout_secs: None,
        }
    }

    /// Builds a lazy model handle; nothing is loaded yet.
    pub fn model_handle(&self) -> RedactorResult<ModelHandle> {
        let provider: Arc<dyn RecognitionProvider> = match self.kind {
            RecognizerKind::Gazetteer => Arc::new(GazetteerProvider),
            RecognizerKind::Remote => {
                let endpoint = self.endpoint.as_deref().ok_or_else(|| {
                    RedactorError::config("recognizer.endpoint", "required for remote recognizers")
                })?;
                let mut provider = RemoteProvider::new(endpoint);
                if let Some(secs) = self.timeout_secs {
                    provider = provider.with_timeout(Duration::from_secs(secs));
                }
                Arc::new(provider)
            }
        };
        Ok(ModelHandle::lazy(provider, self.model.clone()))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub rules: Option<Vec<RuleConfig>>,
    #[serde(default)]
    pub allowed_entity_categories: Option<Vec<RedactionCategory>>,
    #[serde(default)]
    pub entity_labels: BTreeMap<String, RedactionCategory>,
    #[serde(default)]
    pub substitution: SubstitutionMode,
    #[serde(default)]
    pub recognizer: Option<RecognizerConfig>,
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> RedactorResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> RedactorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RedactorError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Compiles the rule list, falling back to the built-in rules.
    pub fn compile_rules(&self) -> RedactorResult<Vec<RedactionRule>> {
        match &self.rules {
            Some(rules) => rules.iter().map(RuleConfig::compile).collect(),
            None => Ok(default_rules()),
        }
    }

    /// Default label map extended by `entity_labels` and restricted by
    /// `allowed_entity_categories`.
    pub fn label_map(&self) -> RedactorResult<LabelMap> {
        let mut labels = LabelMap::default();
        for (label, category) in &self.entity_labels {
            labels = labels.with_label(label.clone(), *category)?;
        }
        match &self.allowed_entity_categories {
            Some(allowed) => labels.with_allowed(allowed.iter().copied()),
            None => Ok(labels),
        }
    }

    /// Builder with rules, labels and mode applied, and the configured
    /// recognizer if any.
    pub fn builder(&self) -> RedactorResult<EngineBuilder> {
        let mut builder = RedactionEngine::builder()
            .rules(self.compile_rules()?)
            .labels(self.label_map()?)
            .substitution(self.substitution);
        if let Some(recognizer) = &self.recognizer {
            builder = builder.model(recognizer.model_handle()?);
        }
        Ok(builder)
    }

    pub fn engine(&self) -> RedactorResult<RedactionEngine> {
        self.builder()?.build()
    }
}

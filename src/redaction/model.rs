//! Once-only model initialization.

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::detection::{EntityRecognizer, RecognitionProvider};
use crate::error::{RedactorError, RedactorResult};

/// Lazily loaded, shared recognition model.
///
/// The first caller to need the model loads it; concurrent first callers
/// block on the same initialization and the provider runs at most once per
/// successful load. A failed load is not cached, so a later call retries.
/// After initialization every read is lock-free.
///
/// The guarantee is per handle, not per process. Every engine built from a
/// config gets its own handle and loads its own copy of the model, so build
/// one [`RedactionEngine`](crate::RedactionEngine) and share it by reference
/// or `Arc` across threads.
pub struct ModelHandle {
    model_id: String,
    provider: Option<Arc<dyn RecognitionProvider>>,
    cell: OnceCell<Box<dyn EntityRecognizer>>,
}

impl ModelHandle {
    /// A handle that loads `model_id` through `provider` on first use.
    pub fn lazy(provider: Arc<dyn RecognitionProvider>, model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            provider: Some(provider),
            cell: OnceCell::new(),
        }
    }

    /// A handle around an already constructed recognizer.
    pub fn preloaded(recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            model_id: recognizer.model_id().to_string(),
            provider: None,
            cell: OnceCell::with_value(recognizer),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the recognizer, loading it if this is the first use.
    pub fn get(&self) -> RedactorResult<&dyn EntityRecognizer> {
        let recognizer = self.cell.get_or_try_init(|| {
            // Only lazy handles can reach an empty cell.
            let provider = self.provider.as_ref().ok_or_else(|| {
                RedactorError::RecognitionUnavailable {
                    model: self.model_id.clone(),
                    reason: "no provider configured".to_string(),
                }
            })?;
            let recognizer = provider.load(&self.model_id)?;
            info!(model = %self.model_id, "Recognition model loaded");
            Ok::<_, RedactorError>(recognizer)
        })?;
        Ok(recognizer.as_ref())
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_id", &self.model_id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

//! Entity recognizer backed by an HTTP inference service.
//!
//! Wire contract:
//! - `GET  {endpoint}/models/{model}` must succeed for the model to load.
//! - `POST {endpoint}/analyze` with `{"model": ..., "text": ...}` returns
//!   `{"entities": [{"start", "end", "label", "text"}]}` in char offsets.

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::entity::{Entity, EntityRecognizer, RecognitionProvider};
use crate::error::{RedactorError, RedactorResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    entities: Vec<Entity>,
}

/// Recognizer for one model on a remote service.
#[derive(Debug, Clone)]
pub struct RemoteRecognizer {
    client: Client,
    endpoint: String,
    model_id: String,
}

impl EntityRecognizer for RemoteRecognizer {
    fn analyze(&self, text: &str) -> RedactorResult<Vec<Entity>> {
        let failed = |reason: String| RedactorError::RecognitionFailed {
            model: self.model_id.clone(),
            reason,
        };

        let response = self
            .client
            .post(format!("{}/analyze", self.endpoint))
            .json(&AnalyzeRequest {
                model: &self.model_id,
                text,
            })
            .send()
            .map_err(|e| failed(e.to_string()))?
            .error_for_status()
            .map_err(|e| failed(e.to_string()))?;

        let body: AnalyzeResponse = response
            .json()
            .map_err(|e| failed(format!("malformed response: {}", e)))?;

        debug!(
            model = %self.model_id,
            entities = body.entities.len(),
            "Remote analysis complete"
        );
        Ok(body.entities)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Loads models from an inference service.
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    endpoint: String,
    timeout: Duration,
}

impl RemoteProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/models/{model_id}`, with the model id encoded as a single
    /// path segment.
    pub fn model_url(&self, model_id: &str) -> Result<Url, String> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| format!("invalid endpoint '{}': {}", self.endpoint, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("endpoint '{}' cannot take a path", self.endpoint))?
            .pop_if_empty()
            .extend(["models", model_id]);
        Ok(url)
    }
}

impl RecognitionProvider for RemoteProvider {
    fn load(&self, model_id: &str) -> RedactorResult<Box<dyn EntityRecognizer>> {
        let unavailable = |reason: String| RedactorError::RecognitionUnavailable {
            model: model_id.to_string(),
            reason,
        };

        let url = self.model_url(model_id).map_err(unavailable)?;
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| unavailable(e.to_string()))?;

        client
            .get(url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| unavailable(e.to_string()))?;

        info!(model = %model_id, endpoint = %self.endpoint, "Remote model available");

        Ok(Box::new(RemoteRecognizer {
            client,
            endpoint: self.endpoint.clone(),
            model_id: model_id.to_string(),
        }))
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingProvider;
use super::error::EmbeddingError;
use crate::text::truncate_chars;

/// Bytes of an error body kept in [`EmbeddingError::Status`].
const ERROR_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible `POST {base}/embeddings` endpoint.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    name: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbeddingProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl HttpEmbeddingProvider {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        let name = reqwest::Url::parse(&endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| endpoint.clone());

        Ok(Self {
            client,
            endpoint,
            name,
            model: model.into(),
            api_key,
            timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout {
                provider: self.name.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            EmbeddingError::MalformedResponse {
                provider: self.name.clone(),
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::Unreachable {
                provider: self.name.clone(),
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
                body: truncate_chars(&body, ERROR_BODY_CHARS).to_string(),
            });
        }

        let parsed: EmbeddingResponse =
            response.json().await.map_err(|e| self.transport_error(e))?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .unwrap_or_default();
        if vector.is_empty() {
            return Err(EmbeddingError::EmptyVector {
                provider: self.name.clone(),
            });
        }

        debug!(provider = %self.name, dim = vector.len(), "Embedding received");
        Ok(vector)
    }
}

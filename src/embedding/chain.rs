use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::EmbeddingProvider;
use super::config::EmbeddingConfig;
use super::error::EmbeddingError;
use super::http::HttpEmbeddingProvider;
use super::stub::StubEmbedder;

pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Ordered provider list with a per-attempt timeout and bounded retries.
///
/// Each provider gets `1 + max_retries` attempts for retryable errors; a content error
/// or an exhausted provider moves on to the next one. The semaphore caps concurrent
/// calls across every caller sharing the chain.
pub struct ProviderChain {
    providers: Vec<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
    permits: Semaphore,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderChain")
            .field("providers", &names)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn EmbeddingProvider>>) -> Self {
        let defaults = EmbeddingConfig::default();
        Self {
            providers,
            timeout: defaults.timeout,
            max_retries: defaults.max_retries,
            backoff: DEFAULT_RETRY_BACKOFF,
            permits: Semaphore::new(defaults.max_in_flight),
        }
    }

    /// Builds HTTP providers for each configured URL, or a single stub embedder when
    /// none is configured.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let providers: Vec<Arc<dyn EmbeddingProvider>> = if config.is_stub() {
            warn!(dim = config.stub_dim, "No embedding provider configured, using STUB embedder");
            vec![Arc::new(StubEmbedder::new(config.stub_dim))]
        } else {
            config
                .urls()
                .map(|url| {
                    HttpEmbeddingProvider::new(
                        url,
                        config.model.clone(),
                        config.api_key.clone(),
                        config.timeout,
                    )
                    .map(|p| Arc::new(p) as Arc<dyn EmbeddingProvider>)
                })
                .collect::<Result<_, _>>()?
        };

        info!(
            providers = providers.len(),
            timeout_ms = config.timeout.as_millis() as u64,
            max_retries = config.max_retries,
            max_in_flight = config.max_in_flight,
            "Embedding provider chain ready"
        );

        Ok(Self::new(providers)
            .with_timeout(config.timeout)
            .with_max_retries(config.max_retries)
            .with_max_in_flight(config.max_in_flight))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.permits = Semaphore::new(max_in_flight.max(1));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    async fn attempt(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
    ) -> Result<Vec<f32>, EmbeddingError> {
        match tokio::time::timeout(self.timeout, provider.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(EmbeddingError::Timeout {
                provider: provider.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ProviderChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.providers.is_empty() {
            return Err(EmbeddingError::NoProviders);
        }
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| EmbeddingError::Unreachable {
                provider: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let mut last_error = EmbeddingError::NoProviders;
        for provider in &self.providers {
            for attempt in 0..=self.max_retries {
                if attempt > 0 {
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                match self.attempt(provider.as_ref(), text).await {
                    Ok(vector) => {
                        if attempt > 0 {
                            debug!(provider = provider.name(), attempt, "Embedding succeeded after retry");
                        }
                        return Ok(vector);
                    }
                    Err(e) if e.is_retryable() && attempt < self.max_retries => {
                        warn!(provider = provider.name(), attempt, error = %e, "Embedding attempt failed, retrying");
                        last_error = e;
                    }
                    Err(e) => {
                        warn!(provider = provider.name(), error = %e, "Embedding provider failed");
                        last_error = e;
                        break;
                    }
                }
            }
        }

        Err(EmbeddingError::Exhausted {
            last: Box::new(last_error),
        })
    }
}

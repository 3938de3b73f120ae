use std::env;
use std::time::Duration;

use super::error::EmbeddingError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
pub const DEFAULT_STUB_DIM: usize = 256;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
/// Embedding provider settings. With no URL configured the stub embedder is used.
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API (`{url}/embeddings`).
    pub url: Option<String>,
    /// Tried after `url` is exhausted.
    pub fallback_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries per provider for retryable errors.
    pub max_retries: u32,
    /// Concurrent provider calls across all workers.
    pub max_in_flight: usize,
    /// Output dimension of the stub embedder.
    pub stub_dim: usize,
    /// Distinct documents kept in the embedding cache.
    pub cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: None,
            fallback_url: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            stub_dim: DEFAULT_STUB_DIM,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EmbeddingConfig {
    const ENV_URL: &'static str = "JOBMATCH_EMBEDDING_URL";
    const ENV_FALLBACK_URL: &'static str = "JOBMATCH_EMBEDDING_FALLBACK_URL";
    const ENV_MODEL: &'static str = "JOBMATCH_EMBEDDING_MODEL";
    const ENV_API_KEY: &'static str = "JOBMATCH_EMBEDDING_API_KEY";
    const ENV_TIMEOUT_MS: &'static str = "JOBMATCH_EMBEDDING_TIMEOUT_MS";
    const ENV_MAX_RETRIES: &'static str = "JOBMATCH_EMBEDDING_MAX_RETRIES";
    const ENV_MAX_IN_FLIGHT: &'static str = "JOBMATCH_EMBEDDING_MAX_IN_FLIGHT";
    const ENV_STUB_DIM: &'static str = "JOBMATCH_STUB_DIM";
    const ENV_CACHE_CAPACITY: &'static str = "JOBMATCH_EMBEDDING_CACHE_CAPACITY";

    /// Loads config from environment variables; unparseable numbers fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: non_empty_var(Self::ENV_URL),
            fallback_url: non_empty_var(Self::ENV_FALLBACK_URL),
            model: non_empty_var(Self::ENV_MODEL).unwrap_or(defaults.model),
            api_key: non_empty_var(Self::ENV_API_KEY),
            timeout: parse_var(Self::ENV_TIMEOUT_MS)
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            max_retries: parse_var(Self::ENV_MAX_RETRIES).unwrap_or(defaults.max_retries),
            max_in_flight: parse_var(Self::ENV_MAX_IN_FLIGHT).unwrap_or(defaults.max_in_flight),
            stub_dim: parse_var(Self::ENV_STUB_DIM).unwrap_or(defaults.stub_dim),
            cache_capacity: parse_var(Self::ENV_CACHE_CAPACITY)
                .unwrap_or(defaults.cache_capacity),
        }
    }

    /// Returns `true` when no provider URL is configured.
    pub fn is_stub(&self) -> bool {
        self.url.is_none() && self.fallback_url.is_none()
    }

    /// Provider URLs in the order they are tried.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.url.iter().chain(&self.fallback_url).map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        for url in self.urls() {
            let parsed = reqwest::Url::parse(url).map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("invalid provider url '{}': {}", url, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(EmbeddingError::InvalidConfig {
                    reason: format!("provider url '{}' must be http(s)", url),
                });
            }
        }
        if self.timeout.is_zero() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        if self.max_in_flight == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_in_flight must be greater than zero".to_string(),
            });
        }
        if self.stub_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub_dim must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

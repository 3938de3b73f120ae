use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request to {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("embedding provider {provider} unreachable: {reason}")]
    Unreachable { provider: String, reason: String },

    #[error("embedding provider {provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("embedding provider {provider} returned a malformed response: {reason}")]
    MalformedResponse { provider: String, reason: String },

    #[error("embedding provider {provider} returned an empty vector")]
    EmptyVector { provider: String },

    #[error("no embedding providers configured")]
    NoProviders,

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("all embedding providers failed; last error: {last}")]
    Exhausted { last: Box<EmbeddingError> },
}

impl EmbeddingError {
    /// Network-level failures worth retrying against the same provider.
    ///
    /// Content errors (4xx other than 429, malformed or empty vectors) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Unreachable { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

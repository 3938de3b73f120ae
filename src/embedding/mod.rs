//! Text → vector providers.
//!
//! [`EmbeddingProvider`] is the seam to the external model. [`HttpEmbeddingProvider`]
//! speaks the OpenAI-compatible embeddings API, [`StubEmbedder`] is a deterministic
//! offline stand-in, and [`ProviderChain`] wraps an ordered provider list with timeouts
//! and bounded retries.

mod chain;
/// Provider configuration.
pub mod config;
mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod stub;


pub use chain::{DEFAULT_RETRY_BACKOFF, ProviderChain};
pub use config::EmbeddingConfig;
pub use error::EmbeddingError;
pub use http::HttpEmbeddingProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use stub::StubEmbedder;

use async_trait::async_trait;

#[async_trait]
/// Maps a document to a dense vector.
pub trait EmbeddingProvider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use super::error::ScoringError;
use super::similarity::similarity_percentage;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::hashing::hash_document;

/// Base (pre-boost) score of a posting document against a user document.
///
/// Each distinct document is embedded once and kept, keyed by its BLAKE3 hash, until
/// the cache TTL passes or capacity evicts it.
pub struct SemanticScorer {
    provider: Arc<dyn EmbeddingProvider>,
    vectors: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("provider", &self.provider.name())
            .field("cached_documents", &self.vectors.entry_count())
            .finish()
    }
}

impl SemanticScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, capacity: u64, ttl: Duration) -> Self {
        Self {
            provider,
            vectors: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Embeds `document`, reusing a cached vector when the same text was seen before.
    pub async fn embed_document(&self, document: &str) -> Result<Arc<Vec<f32>>, ScoringError> {
        let key = hash_document(document);
        if let Some(vector) = self.vectors.get(&key) {
            return Ok(vector);
        }

        let vector = self.provider.embed(document).await?;
        if vector.is_empty() {
            return Err(EmbeddingError::EmptyVector {
                provider: self.provider.name().to_string(),
            }
            .into());
        }

        let vector = Arc::new(vector);
        self.vectors.insert(key, vector.clone());
        debug!(dim = vector.len(), doc_len = document.len(), "Document embedded");
        Ok(vector)
    }

    /// Scores two documents on the 0..100 scale.
    pub async fn score(&self, user_doc: &str, posting_doc: &str) -> Result<f64, ScoringError> {
        let user = self.embed_document(user_doc).await?;
        self.score_with_user_vector(&user, posting_doc).await
    }

    /// Scores `posting_doc` against an already embedded user document.
    pub async fn score_with_user_vector(
        &self,
        user_vector: &[f32],
        posting_doc: &str,
    ) -> Result<f64, ScoringError> {
        let posting = self.embed_document(posting_doc).await?;
        Ok(similarity_percentage(user_vector, &posting))
    }

    pub fn cached_documents(&self) -> u64 {
        self.vectors.run_pending_tasks();
        self.vectors.entry_count()
    }

    pub fn clear(&self) {
        self.vectors.invalidate_all();
    }
}

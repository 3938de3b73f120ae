use async_trait::async_trait;
use tracing::debug;

use super::EmbeddingProvider;
use super::error::EmbeddingError;
use crate::hashing::hash_to_u64;
use crate::text::tokenize;

/// Deterministic offline embedder (hashed bag of words, L2-normalized).
///
/// Documents sharing words get positive similarity, which is enough to run the whole
/// pipeline without a model. Not a substitute for a real provider.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            let index = (hash_to_u64(token.as_bytes()) % self.dim as u64) as usize;
            embedding[index] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating stub embedding");
        Ok(self.embed_text(text))
    }
}

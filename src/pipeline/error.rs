use thiserror::Error;

use crate::scoring::ScoringError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The user document could not be embedded, so nothing can be scored.
    #[error("user document could not be embedded: {0}")]
    UserEmbedding(#[source] ScoringError),
}

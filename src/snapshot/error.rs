use thiserror::Error;

use crate::model::UserId;
use crate::pipeline::MatchError;
use crate::scoring::ScoringError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// No profile, or a profile with nothing to match on. Skipped, not failed.
    #[error("user {user_id} has no profile signal")]
    IneligibleUser { user_id: UserId },

    /// Nothing in the candidate window passed the filters and threshold.
    #[error("no eligible postings for user {user_id}")]
    NoEligiblePostings { user_id: UserId },

    #[error("embedding failed: {0}")]
    Embedding(#[source] ScoringError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("generation cancelled by shutdown")]
    Cancelled,
}

impl GenerationError {
    /// Returns `true` for outcomes counted as skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::IneligibleUser { .. })
    }
}

impl From<MatchError> for GenerationError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::Store(e) => Self::Persistence(e),
            MatchError::UserEmbedding(e) => Self::Embedding(e),
        }
    }
}

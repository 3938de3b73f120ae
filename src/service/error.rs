use thiserror::Error;

use crate::lifecycle::SweepError;
use crate::model::UserId;
use crate::pipeline::MatchError;
use crate::snapshot::GenerationError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown user {user_id}")]
    UserNotFound { user_id: UserId },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("matching failed: {0}")]
    Matching(#[from] MatchError),

    #[error("generation run failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("sweep failed: {0}")]
    Sweep(#[from] SweepError),
}

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("storage error during sweep: {0}")]
    Store(#[from] StoreError),
}

pub type SweepResult<T> = Result<T, SweepError>;

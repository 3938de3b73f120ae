use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert collided with an existing canonical link.
    #[error("posting with link '{link}' already exists")]
    DuplicateLink { link: String },

    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("storage write failed: {reason}")]
    WriteFailed { reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Score thresholds live on the 0-100 scale.
    #[error("{name} must be between 0 and 100, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    #[error("invalid embedding config: {0}")]
    Embedding(#[from] EmbeddingError),
}

//! Recommendation snapshot generation.
//!
//! Each run replaces a user's whole recommendation set in one write, so readers see
//! either the previous generation or the new one, never a mix.

mod error;
mod generator;


pub use error::GenerationError;
pub use generator::{GenerationStats, SnapshotGenerator, SnapshotSettings};

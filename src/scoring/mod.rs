//! Semantic similarity between user and posting documents.

mod error;
mod scorer;
mod similarity;


pub use error::ScoringError;
pub use scorer::SemanticScorer;
pub use similarity::{cosine_similarity, similarity_percentage};

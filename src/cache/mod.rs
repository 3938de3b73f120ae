//! Match score cache (freshness-bounded, upsert-only).

mod match_cache;
pub mod types;

#[cfg(test)]
mod tests;

pub use match_cache::MatchScoreCache;
pub use types::{MATCH_STATUS_HEADER, MatchStatus};

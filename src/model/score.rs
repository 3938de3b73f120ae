use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostingId, UserId};
use crate::constants::{MAX_MATCH_REASONS, MAX_SCORE, MIN_SCORE};

/// Clamps to `[0, 100]` and rounds to two decimals. NaN maps to `0`.
pub fn round_score(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    let clamped = score.clamp(MIN_SCORE, MAX_SCORE);
    (clamped * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Components of a final score.
pub struct SubScores {
    /// Cosine similarity scaled to 0..100.
    pub semantic: f64,
    pub title_boost: f64,
    pub skill_boost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Cached (user, posting) score. At most one row per key.
pub struct MatchScore {
    pub user_id: UserId,
    pub posting_id: PostingId,
    pub relevance_score: f64,
    #[serde(default)]
    pub sub_scores: Option<SubScores>,
    #[serde(default)]
    pub match_reasons: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl MatchScore {
    /// Builds a row, enforcing the score range and reason cap.
    pub fn new(
        user_id: UserId,
        posting_id: PostingId,
        relevance_score: f64,
        mut match_reasons: Vec<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        match_reasons.truncate(MAX_MATCH_REASONS);
        Self {
            user_id,
            posting_id,
            relevance_score: round_score(relevance_score),
            sub_scores: None,
            match_reasons,
            updated_at,
        }
    }

    pub fn with_sub_scores(mut self, sub_scores: SubScores) -> Self {
        self.sub_scores = Some(sub_scores);
        self
    }

    pub fn key(&self) -> (UserId, PostingId) {
        (self.user_id, self.posting_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One row of a user's current recommendation set.
pub struct RecommendationSnapshot {
    pub user_id: UserId,
    pub posting_id: PostingId,
    pub match_score: f64,
    pub match_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RecommendationSnapshot {
    pub fn key(&self) -> (UserId, PostingId) {
        (self.user_id, self.posting_id)
    }

    /// Reasons joined for display.
    pub fn match_reason(&self) -> String {
        self.match_reasons.join("; ")
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

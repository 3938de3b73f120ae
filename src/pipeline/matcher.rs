use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use futures_util::{StreamExt, stream};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::MatchError;
use crate::cache::MatchScoreCache;
use crate::heuristics::{Adjustment, MatchProfile, adjust, screen};
use crate::model::{MatchScore, Posting, PostingId, UserSignal};
use crate::scoring::SemanticScorer;
use crate::store::{PostingStore, StoreResult};
use crate::text::{represent_posting, represent_user};

/// Posting documents scored concurrently per user.
pub const DEFAULT_SCORING_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRequest {
    /// Final scores below this are dropped and not cached.
    pub min_score: f64,
    pub limit: usize,
    /// Take fresh cached rows instead of rescoring those postings.
    pub reuse_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPosting {
    pub posting: Posting,
    pub score: MatchScore,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Highest score first, at most `limit`.
    pub matches: Vec<ScoredPosting>,
    pub candidates: usize,
    /// Postings removed by the category filter or a per-user exclusion.
    pub excluded: usize,
    /// Candidates answered from the match score cache.
    pub reused: usize,
    /// Candidates sent through the semantic scorer.
    pub scored: usize,
    /// Postings whose document could not be embedded (scored from a base of 0).
    pub embedding_failures: usize,
    pub below_threshold: usize,
}

impl MatchOutcome {
    /// Candidates that survived every exclusion, whatever their score.
    pub fn eligible(&self) -> usize {
        self.candidates.saturating_sub(self.excluded)
    }
}

/// Runs the filter → score → boost pipeline for one user.
pub struct Matcher {
    postings: Arc<dyn PostingStore>,
    scorer: Arc<SemanticScorer>,
    cache: Arc<MatchScoreCache>,
    window: Duration,
    candidate_limit: usize,
    concurrency: usize,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("window", &self.window)
            .field("candidate_limit", &self.candidate_limit)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Matcher {
    pub fn new(
        postings: Arc<dyn PostingStore>,
        scorer: Arc<SemanticScorer>,
        cache: Arc<MatchScoreCache>,
        window: Duration,
        candidate_limit: usize,
    ) -> Self {
        Self {
            postings,
            scorer,
            cache,
            window,
            candidate_limit,
            concurrency: DEFAULT_SCORING_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn cache(&self) -> &MatchScoreCache {
        &self.cache
    }

    /// Most recent active postings inside the candidate window.
    pub async fn candidates(&self) -> StoreResult<Vec<Posting>> {
        let since = self
            .cache
            .now()
            .checked_sub_signed(self.window)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
        self.postings.recent(since, self.candidate_limit).await
    }

    /// Scores the candidate set for `signal`.
    ///
    /// Per-posting embedding failures are logged and scored from a base of 0; only a
    /// failure to embed the user document fails the call. New scores at or above
    /// `min_score` are upserted into the cache.
    #[instrument(skip(self, signal), fields(user_id = %signal.user_id))]
    pub async fn match_user(
        &self,
        signal: &UserSignal,
        request: MatchRequest,
    ) -> Result<MatchOutcome, MatchError> {
        let user_id = signal.user_id;
        let profile = MatchProfile::from_signal(signal);
        let candidates = self.candidates().await?;

        let mut outcome = MatchOutcome {
            candidates: candidates.len(),
            ..MatchOutcome::default()
        };

        let mut eligible = Vec::with_capacity(candidates.len());
        for posting in candidates {
            match screen(&profile, &posting) {
                Ok(()) => eligible.push(posting),
                Err(exclusion) => {
                    debug!(posting_id = %posting.id, %exclusion, "Candidate excluded");
                    outcome.excluded += 1;
                }
            }
        }

        let mut cached: HashMap<PostingId, MatchScore> = if request.reuse_cache {
            self.cache
                .get_fresh_since(user_id, Some(signal.updated_at))
                .await?
                .into_iter()
                .map(|row| (row.posting_id, row))
                .collect()
        } else {
            HashMap::new()
        };

        let mut to_score = Vec::new();
        for posting in eligible {
            match cached.remove(&posting.id) {
                Some(row) => {
                    outcome.reused += 1;
                    if row.relevance_score >= request.min_score {
                        outcome.matches.push(ScoredPosting {
                            posting,
                            score: row,
                        });
                    } else {
                        outcome.below_threshold += 1;
                    }
                }
                None => to_score.push(posting),
            }
        }

        if !to_score.is_empty() {
            let user_vector = self
                .scorer
                .embed_document(&represent_user(signal))
                .await
                .map_err(MatchError::UserEmbedding)?;
            let fresh = self
                .score_postings(&profile, signal, &user_vector, to_score, request, &mut outcome)
                .await;
            let rows: Vec<MatchScore> = fresh
                .iter()
                .filter(|(_, cacheable)| *cacheable)
                .map(|(scored, _)| scored.score.clone())
                .collect();
            self.cache.upsert_many(rows).await?;
            outcome.matches.extend(fresh.into_iter().map(|(row, _)| row));
        }

        outcome.matches.sort_by(|a, b| {
            b.score
                .relevance_score
                .total_cmp(&a.score.relevance_score)
                .then(a.posting.id.cmp(&b.posting.id))
        });
        outcome.matches.truncate(request.limit);

        debug!(
            candidates = outcome.candidates,
            excluded = outcome.excluded,
            reused = outcome.reused,
            scored = outcome.scored,
            failures = outcome.embedding_failures,
            matches = outcome.matches.len(),
            "Matching complete"
        );
        Ok(outcome)
    }

    /// Returns retained rows paired with whether they may be cached (rows built on a
    /// failed embedding are not).
    async fn score_postings(
        &self,
        profile: &MatchProfile,
        signal: &UserSignal,
        user_vector: &[f32],
        postings: Vec<Posting>,
        request: MatchRequest,
        outcome: &mut MatchOutcome,
    ) -> Vec<(ScoredPosting, bool)> {
        let scorer = &self.scorer;
        let results: Vec<_> = stream::iter(postings)
            .map(|posting| async move {
                let base = scorer
                    .score_with_user_vector(user_vector, &represent_posting(&posting))
                    .await;
                (posting, base)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let now = self.cache.now();
        let mut retained = Vec::new();
        for (posting, base) in results {
            outcome.scored += 1;
            let (base, cacheable) = match base {
                Ok(base) => (base, true),
                Err(e) => {
                    warn!(
                        posting_id = %posting.id,
                        error = %e,
                        "Posting embedding failed, scoring from 0"
                    );
                    outcome.embedding_failures += 1;
                    (0.0, false)
                }
            };

            let scored = match adjust(base, profile, &posting) {
                Adjustment::Scored(scored) => scored,
                Adjustment::Excluded(exclusion) => {
                    debug!(posting_id = %posting.id, %exclusion, "Candidate excluded");
                    outcome.excluded += 1;
                    continue;
                }
            };
            if scored.score < request.min_score {
                outcome.below_threshold += 1;
                continue;
            }

            let score =
                MatchScore::new(signal.user_id, posting.id, scored.score, scored.reasons, now)
                    .with_sub_scores(scored.sub_scores);
            retained.push((ScoredPosting { posting, score }, cacheable));
        }
        retained
    }
}

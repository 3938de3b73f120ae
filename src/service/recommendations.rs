use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::ServiceError;
use crate::cache::{MatchScoreCache, MatchStatus};
use crate::clock::Clock;
use crate::constants::MAX_PAGE_SIZE;
use crate::embedding::EmbeddingProvider;
use crate::lifecycle::{ExpirySweeper, ShutdownSignal, SweepReport};
use crate::model::{Posting, PostingId, UserId};
use crate::pipeline::{MatchRequest, Matcher, MatchingConfig, ScoredPosting, SignalLoader};
use crate::scoring::SemanticScorer;
use crate::snapshot::{GenerationStats, SnapshotGenerator, SnapshotSettings};
use crate::store::{InterestStore, MatchScoreStore, PostingStore, ProfileSource, SnapshotStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub posting: Posting,
    pub match_score: f64,
    /// Reasons joined for display.
    pub match_reason: String,
    pub match_reasons: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchList {
    /// `Hit` when the cache alone answered the request.
    #[serde(skip)]
    pub status: MatchStatus,
    pub matches: Vec<ScoredPosting>,
}

/// Entry point for readers and the scheduler.
pub struct RecommendationService {
    signals: Arc<SignalLoader>,
    matcher: Arc<Matcher>,
    generator: Arc<SnapshotGenerator>,
    sweeper: Arc<ExpirySweeper>,
    postings: Arc<dyn PostingStore>,
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    min_score_on_demand: f64,
    retention_days: u32,
}

impl std::fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationService")
            .field("generator", &self.generator)
            .field("min_score_on_demand", &self.min_score_on_demand)
            .field("retention_days", &self.retention_days)
            .finish()
    }
}

impl RecommendationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        signals: Arc<SignalLoader>,
        matcher: Arc<Matcher>,
        generator: Arc<SnapshotGenerator>,
        sweeper: Arc<ExpirySweeper>,
        postings: Arc<dyn PostingStore>,
        snapshots: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        min_score_on_demand: f64,
        retention_days: u32,
    ) -> Self {
        Self {
            signals,
            matcher,
            generator,
            sweeper,
            postings,
            snapshots,
            clock,
            min_score_on_demand,
            retention_days,
        }
    }

    /// Wires every component over a single store implementing all storage traits.
    pub fn with_store<S>(
        store: Arc<S>,
        provider: Arc<dyn EmbeddingProvider>,
        clock: Arc<dyn Clock>,
        config: &MatchingConfig,
        embedding_cache_capacity: u64,
        retention_days: u32,
        shutdown: ShutdownSignal,
    ) -> Self
    where
        S: PostingStore + MatchScoreStore + SnapshotStore + ProfileSource + InterestStore + 'static,
    {
        let scorer = Arc::new(SemanticScorer::new(
            provider,
            embedding_cache_capacity,
            config.score_ttl,
        ));
        let cache = Arc::new(MatchScoreCache::new(
            store.clone(),
            clock.clone(),
            config.score_ttl,
        ));
        let matcher = Arc::new(Matcher::new(
            store.clone(),
            scorer,
            cache,
            config.candidate_window_chrono(),
            config.candidate_limit,
        ));
        let signals = Arc::new(SignalLoader::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        ));
        let generator = Arc::new(
            SnapshotGenerator::new(
                signals.clone(),
                matcher.clone(),
                store.clone(),
                clock.clone(),
                SnapshotSettings::from_config(config),
            )
            .with_shutdown(shutdown),
        );
        let sweeper = Arc::new(ExpirySweeper::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        ));

        Self::new(
            signals,
            matcher,
            generator,
            sweeper,
            store.clone(),
            store,
            clock,
            config.min_score_on_demand,
            retention_days,
        )
    }

    /// Reads the user's unexpired snapshot, highest score first.
    ///
    /// `page` is 1-based and `page_size` is clamped to `[1, MAX_PAGE_SIZE]`. A user with
    /// no snapshot gets an empty page.
    #[instrument(skip(self))]
    pub async fn get_recommendations(
        &self,
        user_id: UserId,
        page: usize,
        page_size: usize,
    ) -> Result<Page<Recommendation>, ServiceError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let rows = self
            .snapshots
            .active_for_user(user_id, self.clock.now())
            .await?;
        let total = rows.len();
        let rows: Vec<_> = rows
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        let ids: Vec<PostingId> = rows.iter().map(|row| row.posting_id).collect();
        let mut postings = self.posting_map(&ids).await?;
        let items = rows
            .into_iter()
            .filter_map(|row| {
                let Some(posting) = postings.remove(&row.posting_id) else {
                    warn!(posting_id = %row.posting_id, "Snapshot row without posting");
                    return None;
                };
                Some(Recommendation {
                    match_reason: row.match_reason(),
                    posting,
                    match_score: row.match_score,
                    match_reasons: row.match_reasons,
                    expires_at: row.expires_at,
                })
            })
            .collect();

        Ok(Page {
            items,
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        })
    }

    /// Cache-first matches at the on-demand threshold.
    ///
    /// When fresh cached rows cover `limit` they are returned as-is; otherwise the
    /// candidate set is scored and the results cached.
    #[instrument(skip(self))]
    pub async fn get_or_compute_matches(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<MatchList, ServiceError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let Some(signal) = self.signals.load(user_id).await? else {
            return Err(ServiceError::UserNotFound { user_id });
        };
        if !signal.has_signal() {
            return Ok(MatchList {
                status: MatchStatus::Miss,
                matches: Vec::new(),
            });
        }

        let fresh: Vec<_> = self
            .matcher
            .cache()
            .get_fresh_since(user_id, Some(signal.updated_at))
            .await?
            .into_iter()
            .filter(|row| row.relevance_score >= self.min_score_on_demand)
            .collect();

        if fresh.len() >= limit {
            let ids: Vec<PostingId> = fresh.iter().map(|row| row.posting_id).collect();
            let mut postings = self.posting_map(&ids).await?;
            let matches: Vec<ScoredPosting> = fresh
                .into_iter()
                .filter_map(|score| {
                    postings
                        .remove(&score.posting_id)
                        .filter(Posting::is_active)
                        .map(|posting| ScoredPosting { posting, score })
                })
                .take(limit)
                .collect();
            if matches.len() == limit {
                debug!(%user_id, limit, "Matches served from cache");
                return Ok(MatchList {
                    status: MatchStatus::Hit,
                    matches,
                });
            }
        }

        let request = MatchRequest {
            min_score: self.min_score_on_demand,
            limit,
            reuse_cache: true,
        };
        let outcome = self.matcher.match_user(&signal, request).await?;
        debug!(%user_id, matches = outcome.matches.len(), "Matches computed on demand");
        Ok(MatchList {
            status: MatchStatus::Miss,
            matches: outcome.matches,
        })
    }

    /// Trigger hook: regenerates every user's snapshot.
    pub async fn run_generation(&self) -> Result<GenerationStats, ServiceError> {
        Ok(self.generator.generate_for_all_users().await?)
    }

    /// Trigger hook: runs every expiry sweep.
    pub async fn run_sweep(&self) -> Result<SweepReport, ServiceError> {
        Ok(self.sweeper.run_all(self.retention_days).await?)
    }

    pub fn generator(&self) -> &SnapshotGenerator {
        &self.generator
    }

    pub fn sweeper(&self) -> &ExpirySweeper {
        &self.sweeper
    }

    async fn posting_map(
        &self,
        ids: &[PostingId],
    ) -> Result<HashMap<PostingId, Posting>, ServiceError> {
        Ok(self
            .postings
            .get_many(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }
}

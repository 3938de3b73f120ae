use std::sync::Arc;

use chrono::Duration;
use futures_util::{StreamExt, stream};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::GenerationError;
use crate::clock::Clock;
use crate::lifecycle::ShutdownSignal;
use crate::model::{RecommendationSnapshot, UserId};
use crate::pipeline::{MatchRequest, Matcher, MatchingConfig, SignalLoader};
use crate::store::SnapshotStore;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSettings {
    pub top_n: usize,
    pub min_score: f64,
    /// `expires_at = created_at + horizon` for every row of a run.
    pub horizon: Duration,
    /// Users processed concurrently.
    pub workers: usize,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl SnapshotSettings {
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            top_n: config.snapshot_top_n,
            min_score: config.min_score_snapshot,
            horizon: Duration::from_std(config.snapshot_horizon).unwrap_or(Duration::MAX),
            workers: config.generation_workers,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// Users without any signal.
    pub skipped: usize,
    /// Users not started because shutdown was requested.
    pub cancelled: usize,
    pub total_recommendations: usize,
}

/// Computes and stores each user's top-N recommendation set.
pub struct SnapshotGenerator {
    signals: Arc<SignalLoader>,
    matcher: Arc<Matcher>,
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    settings: SnapshotSettings,
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for SnapshotGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotGenerator")
            .field("settings", &self.settings)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

impl SnapshotGenerator {
    pub fn new(
        signals: Arc<SignalLoader>,
        matcher: Arc<Matcher>,
        snapshots: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        settings: SnapshotSettings,
    ) -> Self {
        Self {
            signals,
            matcher,
            snapshots,
            clock,
            settings,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Stops dispatching new users once `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn settings(&self) -> &SnapshotSettings {
        &self.settings
    }

    /// Regenerates `user_id`'s set and returns the number of rows written.
    ///
    /// Any error leaves the previous set untouched.
    #[instrument(skip(self))]
    pub async fn generate_for_user(&self, user_id: UserId) -> Result<usize, GenerationError> {
        let signal = match self.signals.load(user_id).await? {
            Some(signal) if signal.has_signal() => signal,
            _ => return Err(GenerationError::IneligibleUser { user_id }),
        };

        let request = MatchRequest {
            min_score: self.settings.min_score,
            limit: self.settings.top_n,
            reuse_cache: true,
        };
        let outcome = self.matcher.match_user(&signal, request).await?;
        if outcome.matches.is_empty() {
            return Err(GenerationError::NoEligiblePostings { user_id });
        }

        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(self.settings.horizon)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
        let rows: Vec<RecommendationSnapshot> = outcome
            .matches
            .into_iter()
            .map(|m| RecommendationSnapshot {
                user_id,
                posting_id: m.posting.id,
                match_score: m.score.relevance_score,
                match_reasons: m.score.match_reasons,
                created_at,
                expires_at,
            })
            .collect();

        let written = self.snapshots.replace_for_user(user_id, rows).await?;
        debug!(%user_id, written, %expires_at, "Snapshot replaced");
        Ok(written)
    }

    /// Regenerates every known user on a bounded worker pool.
    ///
    /// Per-user failures are counted, not returned; only failing to list users is an
    /// error.
    #[instrument(skip(self))]
    pub async fn generate_for_all_users(&self) -> Result<GenerationStats, GenerationError> {
        let user_ids = self.signals.user_ids().await?;
        let mut stats = GenerationStats {
            total: user_ids.len(),
            ..GenerationStats::default()
        };
        info!(users = stats.total, workers = self.settings.workers, "Generation run starting");

        let results: Vec<(UserId, Result<usize, GenerationError>)> = stream::iter(user_ids)
            .map(|user_id| async move {
                if self.shutdown.is_triggered() {
                    return (user_id, Err(GenerationError::Cancelled));
                }
                (user_id, self.generate_for_user(user_id).await)
            })
            .buffer_unordered(self.settings.workers.max(1))
            .collect()
            .await;

        for (user_id, result) in results {
            match result {
                Ok(written) => {
                    stats.success += 1;
                    stats.total_recommendations += written;
                }
                Err(GenerationError::Cancelled) => stats.cancelled += 1,
                Err(e) if e.is_skip() => {
                    debug!(%user_id, "Skipping user without signal");
                    stats.skipped += 1;
                }
                Err(e) => {
                    warn!(%user_id, error = %e, "Snapshot generation failed for user");
                    stats.failed += 1;
                }
            }
        }

        info!(
            total = stats.total,
            success = stats.success,
            failed = stats.failed,
            skipped = stats.skipped,
            cancelled = stats.cancelled,
            recommendations = stats.total_recommendations,
            "Generation run complete"
        );
        Ok(stats)
    }
}

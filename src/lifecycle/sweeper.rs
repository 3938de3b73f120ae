use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::error::SweepResult;
use crate::clock::Clock;
use crate::model::PostingId;
use crate::store::{InterestStore, MatchScoreStore, PostingStore, SnapshotStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub recommendations: usize,
    pub saved_records: usize,
    pub postings: usize,
}

/// Deletes expired snapshot rows, expired saved records and stale postings.
///
/// Every sweep is idempotent: a second run with nothing newly expired deletes nothing.
pub struct ExpirySweeper {
    postings: Arc<dyn PostingStore>,
    scores: Arc<dyn MatchScoreStore>,
    snapshots: Arc<dyn SnapshotStore>,
    interests: Arc<dyn InterestStore>,
    clock: Arc<dyn Clock>,
}

impl ExpirySweeper {
    pub fn new(
        postings: Arc<dyn PostingStore>,
        scores: Arc<dyn MatchScoreStore>,
        snapshots: Arc<dyn SnapshotStore>,
        interests: Arc<dyn InterestStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            postings,
            scores,
            snapshots,
            interests,
            clock,
        }
    }

    pub async fn sweep_expired_recommendations(&self) -> SweepResult<usize> {
        let deleted = self.snapshots.delete_expired(self.clock.now()).await?;
        debug!(deleted, "Expired recommendations swept");
        Ok(deleted)
    }

    pub async fn sweep_expired_saved_records(&self) -> SweepResult<usize> {
        let deleted = self.interests.delete_expired_saved(self.clock.now()).await?;
        debug!(deleted, "Expired saved records swept");
        Ok(deleted)
    }

    /// Deletes postings scraped more than `retention_days` ago, with their cached
    /// scores and snapshot rows.
    ///
    /// External postings and postings referenced by any interest record are kept.
    pub async fn sweep_old_postings(&self, retention_days: u32) -> SweepResult<usize> {
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(Duration::days(i64::from(retention_days)))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);

        let old = self.postings.scraped_before(cutoff).await?;
        if old.is_empty() {
            return Ok(0);
        }
        let referenced = self.interests.referenced_posting_ids().await?;
        let doomed: Vec<PostingId> = old
            .iter()
            .filter(|p| !p.source.is_external() && !referenced.contains(&p.id))
            .map(|p| p.id)
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        let scores = self.scores.delete_for_postings(&doomed).await?;
        let snapshots = self.snapshots.delete_for_postings(&doomed).await?;
        let deleted = self.postings.delete_many(&doomed).await?;
        debug!(
            deleted,
            kept = old.len() - doomed.len(),
            scores,
            snapshots,
            %cutoff,
            "Old postings swept"
        );
        Ok(deleted)
    }

    /// Runs every sweep. Saved records go before postings so a posting held only by an
    /// expired saved record is released in the same run.
    #[instrument(skip(self))]
    pub async fn run_all(&self, retention_days: u32) -> SweepResult<SweepReport> {
        let report = SweepReport {
            recommendations: self.sweep_expired_recommendations().await?,
            saved_records: self.sweep_expired_saved_records().await?,
            postings: self.sweep_old_postings(retention_days).await?,
        };
        info!(
            recommendations = report.recommendations,
            saved_records = report.saved_records,
            postings = report.postings,
            "Sweep complete"
        );
        Ok(report)
    }
}

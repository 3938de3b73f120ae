use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::model::{MatchScore, PostingId, UserId};
use crate::store::{MatchScoreStore, StoreResult};

/// Freshness-bounded view over [`MatchScoreStore`].
///
/// Rows older than the TTL are misses, never deletions: they stay in storage until a
/// rescore overwrites them or their posting is swept.
pub struct MatchScoreCache {
    store: Arc<dyn MatchScoreStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for MatchScoreCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScoreCache")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl MatchScoreCache {
    pub fn new(store: Arc<dyn MatchScoreStore>, clock: Arc<dyn Clock>, ttl: std::time::Duration) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Oldest `updated_at` still considered fresh: `now - ttl`, raised to `not_before`
    /// when given (a profile change invalidates older scores).
    pub fn freshness_cutoff(&self, not_before: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let by_ttl = self
            .clock
            .now()
            .checked_sub_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match not_before {
            Some(not_before) => by_ttl.max(not_before),
            None => by_ttl,
        }
    }

    /// Rows within the TTL, highest score first.
    pub async fn get_fresh(&self, user_id: UserId) -> StoreResult<Vec<MatchScore>> {
        self.get_fresh_since(user_id, None).await
    }

    /// Like [`MatchScoreCache::get_fresh`], also dropping rows older than `not_before`.
    pub async fn get_fresh_since(
        &self,
        user_id: UserId,
        not_before: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<MatchScore>> {
        let cutoff = self.freshness_cutoff(not_before);
        let mut rows = self.store.updated_since(user_id, cutoff).await?;
        rows.sort_by(|a, b| {
            b.relevance_score
                .total_cmp(&a.relevance_score)
                .then(a.posting_id.cmp(&b.posting_id))
        });
        debug!(%user_id, fresh = rows.len(), %cutoff, "Match score cache read");
        Ok(rows)
    }

    /// Last-write-wins upsert of one (user, posting) score, stamped with the current time.
    pub async fn upsert(
        &self,
        user_id: UserId,
        posting_id: PostingId,
        score: f64,
        reasons: Vec<String>,
    ) -> StoreResult<MatchScore> {
        let row = MatchScore::new(user_id, posting_id, score, reasons, self.clock.now());
        self.store.upsert_many(vec![row.clone()]).await?;
        Ok(row)
    }

    pub async fn upsert_many(&self, rows: Vec<MatchScore>) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.store.upsert_many(rows).await
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

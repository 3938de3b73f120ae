//! Storage seams.
//!
//! The core never talks to a database directly: postings, cached scores, snapshots,
//! profiles and interest history are reached through these traits so the generator and
//! the service can be constructed with any engine. [`MemoryStore`] implements all of
//! them in-process.

mod error;
mod memory;
pub mod seed;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use seed::{SeedData, SeedReport};

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{
    InterestRecord, MatchScore, Posting, PostingId, RecommendationSnapshot, UserId, UserSignal,
};

#[async_trait]
/// Deduplicated postings keyed by id and canonical link.
pub trait PostingStore: Send + Sync {
    async fn find_by_link(&self, link: &str) -> StoreResult<Option<Posting>>;

    /// Postings whose company equals `company` ignoring case and surrounding whitespace.
    async fn find_by_company(&self, company: &str) -> StoreResult<Vec<Posting>>;

    /// Inserts a new posting; fails with [`StoreError::DuplicateLink`] if the link exists.
    async fn insert(&self, posting: Posting) -> StoreResult<()>;

    /// Postings for `ids`; unknown ids are skipped.
    async fn get_many(&self, ids: &[PostingId]) -> StoreResult<Vec<Posting>>;

    /// Active postings posted at or after `since`, newest first, at most `limit`.
    async fn recent(&self, since: DateTime<Utc>, limit: usize) -> StoreResult<Vec<Posting>>;

    /// Postings ingested strictly before `cutoff`.
    async fn scraped_before(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<Posting>>;

    async fn delete_many(&self, ids: &[PostingId]) -> StoreResult<usize>;
}

#[async_trait]
/// Match score rows, unique per (user, posting). Writes are last-write-wins upserts.
pub trait MatchScoreStore: Send + Sync {
    async fn upsert_many(&self, rows: Vec<MatchScore>) -> StoreResult<()>;

    async fn get(&self, user_id: UserId, posting_id: PostingId) -> StoreResult<Option<MatchScore>>;

    /// Rows for `user_id` with `updated_at >= cutoff`, in no particular order.
    async fn updated_since(
        &self,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> StoreResult<Vec<MatchScore>>;

    async fn delete_for_postings(&self, ids: &[PostingId]) -> StoreResult<usize>;
}

#[async_trait]
/// Per-user recommendation sets.
pub trait SnapshotStore: Send + Sync {
    /// Replaces every row for `user_id` with `rows` as a single all-or-nothing write.
    ///
    /// On error the previous set must be left intact.
    async fn replace_for_user(
        &self,
        user_id: UserId,
        rows: Vec<RecommendationSnapshot>,
    ) -> StoreResult<usize>;

    /// Unexpired rows for `user_id`, highest score first.
    async fn active_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<RecommendationSnapshot>>;

    /// Deletes rows with `expires_at < now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<usize>;

    async fn delete_for_postings(&self, ids: &[PostingId]) -> StoreResult<usize>;
}

#[async_trait]
/// Read-only access to the profile/CV service.
pub trait ProfileSource: Send + Sync {
    async fn user_ids(&self) -> StoreResult<Vec<UserId>>;

    async fn profile(&self, user_id: UserId) -> StoreResult<Option<UserSignal>>;
}

#[async_trait]
/// Saved/applied records.
pub trait InterestStore: Send + Sync {
    /// Most recent records for `user_id`, newest first.
    async fn recent_for_user(&self, user_id: UserId, limit: usize)
    -> StoreResult<Vec<InterestRecord>>;

    /// Every posting referenced by at least one record.
    async fn referenced_posting_ids(&self) -> StoreResult<HashSet<PostingId>>;

    /// Deletes saved records whose expiry has passed.
    async fn delete_expired_saved(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}

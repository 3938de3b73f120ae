use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::error::{StoreError, StoreResult};
use super::{InterestStore, MatchScoreStore, PostingStore, ProfileSource, SnapshotStore};
use crate::model::{
    InterestRecord, MatchScore, Posting, PostingId, RecommendationSnapshot, UserId, UserSignal,
};

#[derive(Default)]
struct PostingTable {
    by_id: HashMap<PostingId, Posting>,
    by_link: HashMap<String, PostingId>,
}

/// In-process implementation of every storage trait.
///
/// Each table sits behind its own lock; every trait method takes the lock once, so
/// multi-row writes (snapshot replacement, cascading deletes) are atomic.
#[derive(Default)]
pub struct MemoryStore {
    postings: RwLock<PostingTable>,
    scores: RwLock<HashMap<(UserId, PostingId), MatchScore>>,
    snapshots: RwLock<HashMap<UserId, HashMap<PostingId, RecommendationSnapshot>>>,
    profiles: RwLock<HashMap<UserId, UserSignal>>,
    interests: RwLock<Vec<InterestRecord>>,
    fail_writes: AtomicBool,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user profile (the profile service owns these).
    pub fn put_profile(&self, signal: UserSignal) {
        self.profiles.write().insert(signal.user_id, signal);
    }

    /// Appends an interest record (the interest history service owns these).
    pub fn add_interest(&self, record: InterestRecord) {
        self.interests.write().push(record);
    }

    pub fn posting_count(&self) -> usize {
        self.postings.read().by_id.len()
    }

    pub fn score_count(&self) -> usize {
        self.scores.read().len()
    }

    /// Every snapshot row for `user_id`, expired or not.
    pub fn snapshot_rows(&self, user_id: UserId) -> Vec<RecommendationSnapshot> {
        self.snapshots
            .read()
            .get(&user_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn interest_count(&self) -> usize {
        self.interests.read().len()
    }

    /// Makes subsequent writes fail with [`StoreError::WriteFailed`].
    #[cfg(any(test, feature = "mock"))]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Makes every operation fail with [`StoreError::Unavailable`].
    #[cfg(any(test, feature = "mock"))]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable {
                reason: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn check_writable(&self) -> StoreResult<()> {
        self.check_available()?;
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StoreError::WriteFailed {
                reason: "memory store rejecting writes".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("postings", &self.posting_count())
            .field("scores", &self.score_count())
            .field("profiles", &self.profiles.read().len())
            .field("interests", &self.interest_count())
            .finish()
    }
}

#[async_trait]
impl PostingStore for MemoryStore {
    async fn find_by_link(&self, link: &str) -> StoreResult<Option<Posting>> {
        self.check_available()?;
        let table = self.postings.read();
        Ok(table
            .by_link
            .get(link)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_company(&self, company: &str) -> StoreResult<Vec<Posting>> {
        self.check_available()?;
        let company = company.trim().to_lowercase();
        Ok(self
            .postings
            .read()
            .by_id
            .values()
            .filter(|p| p.company.trim().to_lowercase() == company)
            .cloned()
            .collect())
    }

    async fn insert(&self, posting: Posting) -> StoreResult<()> {
        self.check_writable()?;
        let mut table = self.postings.write();
        if table.by_link.contains_key(&posting.link) {
            return Err(StoreError::DuplicateLink { link: posting.link });
        }
        table.by_link.insert(posting.link.clone(), posting.id);
        table.by_id.insert(posting.id, posting);
        Ok(())
    }

    async fn get_many(&self, ids: &[PostingId]) -> StoreResult<Vec<Posting>> {
        self.check_available()?;
        let table = self.postings.read();
        Ok(ids.iter().filter_map(|id| table.by_id.get(id)).cloned().collect())
    }

    async fn recent(&self, since: DateTime<Utc>, limit: usize) -> StoreResult<Vec<Posting>> {
        self.check_available()?;
        let mut postings: Vec<Posting> = self
            .postings
            .read()
            .by_id
            .values()
            .filter(|p| p.is_active() && p.posted_at >= since)
            .cloned()
            .collect();
        postings.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(a.id.cmp(&b.id)));
        postings.truncate(limit);
        Ok(postings)
    }

    async fn scraped_before(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<Posting>> {
        self.check_available()?;
        Ok(self
            .postings
            .read()
            .by_id
            .values()
            .filter(|p| p.scraped_at < cutoff)
            .cloned()
            .collect())
    }

    async fn delete_many(&self, ids: &[PostingId]) -> StoreResult<usize> {
        self.check_writable()?;
        let mut table = self.postings.write();
        let mut deleted = 0;
        for id in ids {
            if let Some(posting) = table.by_id.remove(id) {
                table.by_link.remove(&posting.link);
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl MatchScoreStore for MemoryStore {
    async fn upsert_many(&self, rows: Vec<MatchScore>) -> StoreResult<()> {
        self.check_writable()?;
        let mut scores = self.scores.write();
        for row in rows {
            scores.insert(row.key(), row);
        }
        Ok(())
    }

    async fn get(&self, user_id: UserId, posting_id: PostingId) -> StoreResult<Option<MatchScore>> {
        self.check_available()?;
        Ok(self.scores.read().get(&(user_id, posting_id)).cloned())
    }

    async fn updated_since(
        &self,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> StoreResult<Vec<MatchScore>> {
        self.check_available()?;
        Ok(self
            .scores
            .read()
            .values()
            .filter(|row| row.user_id == user_id && row.updated_at >= cutoff)
            .cloned()
            .collect())
    }

    async fn delete_for_postings(&self, ids: &[PostingId]) -> StoreResult<usize> {
        self.check_writable()?;
        let ids: HashSet<&PostingId> = ids.iter().collect();
        let mut scores = self.scores.write();
        let before = scores.len();
        scores.retain(|(_, posting_id), _| !ids.contains(posting_id));
        Ok(before - scores.len())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn replace_for_user(
        &self,
        user_id: UserId,
        rows: Vec<RecommendationSnapshot>,
    ) -> StoreResult<usize> {
        self.check_writable()?;
        if let Some(foreign) = rows.iter().find(|row| row.user_id != user_id) {
            return Err(StoreError::WriteFailed {
                reason: format!(
                    "snapshot row for user {} in replacement batch for {}",
                    foreign.user_id, user_id
                ),
            });
        }

        let replacement: HashMap<PostingId, RecommendationSnapshot> = rows
            .into_iter()
            .map(|row| (row.posting_id, row))
            .collect();
        let count = replacement.len();

        let mut snapshots = self.snapshots.write();
        if replacement.is_empty() {
            snapshots.remove(&user_id);
        } else {
            snapshots.insert(user_id, replacement);
        }
        Ok(count)
    }

    async fn active_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<RecommendationSnapshot>> {
        self.check_available()?;
        let mut rows: Vec<RecommendationSnapshot> = self
            .snapshots
            .read()
            .get(&user_id)
            .map(|rows| {
                rows.values()
                    .filter(|row| !row.is_expired(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            b.match_score
                .total_cmp(&a.match_score)
                .then(a.posting_id.cmp(&b.posting_id))
        });
        Ok(rows)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        self.check_writable()?;
        let mut snapshots = self.snapshots.write();
        let mut deleted = 0;
        for rows in snapshots.values_mut() {
            let before = rows.len();
            rows.retain(|_, row| !row.is_expired(now));
            deleted += before - rows.len();
        }
        snapshots.retain(|_, rows| !rows.is_empty());
        Ok(deleted)
    }

    async fn delete_for_postings(&self, ids: &[PostingId]) -> StoreResult<usize> {
        self.check_writable()?;
        let mut snapshots = self.snapshots.write();
        let mut deleted = 0;
        for rows in snapshots.values_mut() {
            for id in ids {
                if rows.remove(id).is_some() {
                    deleted += 1;
                }
            }
        }
        snapshots.retain(|_, rows| !rows.is_empty());
        Ok(deleted)
    }
}

#[async_trait]
impl ProfileSource for MemoryStore {
    async fn user_ids(&self) -> StoreResult<Vec<UserId>> {
        self.check_available()?;
        let mut ids: Vec<UserId> = self.profiles.read().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    async fn profile(&self, user_id: UserId) -> StoreResult<Option<UserSignal>> {
        self.check_available()?;
        Ok(self.profiles.read().get(&user_id).cloned())
    }
}

#[async_trait]
impl InterestStore for MemoryStore {
    async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> StoreResult<Vec<InterestRecord>> {
        self.check_available()?;
        let mut records: Vec<InterestRecord> = self
            .interests
            .read()
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn referenced_posting_ids(&self) -> StoreResult<HashSet<PostingId>> {
        self.check_available()?;
        Ok(self
            .interests
            .read()
            .iter()
            .map(|record| record.posting_id)
            .collect())
    }

    async fn delete_expired_saved(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        self.check_writable()?;
        let mut interests = self.interests.write();
        let before = interests.len();
        interests.retain(|record| !record.is_expired(now));
        Ok(before - interests.len())
    }
}

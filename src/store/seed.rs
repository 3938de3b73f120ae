//! JSON seed data for the in-memory store.
//!
//! Postings go through the [`Deduplicator`] like any other ingested candidate; interest
//! records refer to postings by link since seeded postings get fresh ids.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::{StoreError, StoreResult};
use super::memory::MemoryStore;
use super::PostingStore;
use crate::ingest::{Deduplicator, canonicalize_link};
use crate::model::{InterestKind, InterestRecord, PostingCandidate, UserId, UserSignal};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedInterest {
    pub user_id: UserId,
    pub posting_link: String,
    pub kind: InterestKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub postings: Vec<PostingCandidate>,
    #[serde(default)]
    pub profiles: Vec<UserSignal>,
    #[serde(default)]
    pub interests: Vec<SeedInterest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub postings: usize,
    pub rejected_postings: usize,
    pub profiles: usize,
    pub interests: usize,
    pub orphan_interests: usize,
}

impl SeedData {
    pub fn load(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::SeedParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads profiles, postings and interest records into `store`.
    pub async fn apply(self, store: &MemoryStore, dedup: &Deduplicator) -> StoreResult<SeedReport> {
        let mut report = SeedReport::default();

        for profile in self.profiles {
            store.put_profile(profile);
            report.profiles += 1;
        }

        let ingest = dedup.ingest_batch(self.postings).await?;
        report.postings = ingest.accepted;
        report.rejected_postings = ingest.duplicates + ingest.malformed;

        for interest in self.interests {
            let posting = match canonicalize_link(&interest.posting_link) {
                Some(link) => store.find_by_link(&link).await?,
                None => None,
            };
            let Some(posting) = posting else {
                warn!(link = %interest.posting_link, "Seed interest references unknown posting");
                report.orphan_interests += 1;
                continue;
            };
            store.add_interest(InterestRecord {
                user_id: interest.user_id,
                posting_id: posting.id,
                kind: interest.kind,
                created_at: interest.created_at,
                expires_at: interest.expires_at,
            });
            report.interests += 1;
        }

        info!(
            postings = report.postings,
            rejected = report.rejected_postings,
            profiles = report.profiles,
            interests = report.interests,
            "Seed data loaded"
        );
        Ok(report)
    }
}

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::constants::MAX_INTEREST_SIGNALS;
use crate::model::{InterestedPosting, Posting, PostingId, UserId, UserSignal};
use crate::store::{InterestStore, PostingStore, ProfileSource, StoreResult};

/// Builds a user's [`UserSignal`]: the profile as stored, with recent saved/applied
/// postings folded into `recent_interests`.
pub struct SignalLoader {
    profiles: Arc<dyn ProfileSource>,
    interests: Arc<dyn InterestStore>,
    postings: Arc<dyn PostingStore>,
    clock: Arc<dyn Clock>,
}

impl SignalLoader {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        interests: Arc<dyn InterestStore>,
        postings: Arc<dyn PostingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            interests,
            postings,
            clock,
        }
    }

    pub async fn user_ids(&self) -> StoreResult<Vec<UserId>> {
        self.profiles.user_ids().await
    }

    /// Returns `None` when the profile service does not know `user_id`.
    pub async fn load(&self, user_id: UserId) -> StoreResult<Option<UserSignal>> {
        let Some(mut signal) = self.profiles.profile(user_id).await? else {
            return Ok(None);
        };

        let now = self.clock.now();
        // Over-fetch so expired saved records don't starve the window.
        let records: Vec<_> = self
            .interests
            .recent_for_user(user_id, MAX_INTEREST_SIGNALS * 2)
            .await?
            .into_iter()
            .filter(|record| !record.is_expired(now))
            .take(MAX_INTEREST_SIGNALS)
            .collect();

        if !records.is_empty() {
            let ids: Vec<PostingId> = records.iter().map(|r| r.posting_id).collect();
            let postings: HashMap<PostingId, Posting> = self
                .postings
                .get_many(&ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

            let joined = records.iter().filter_map(|record| {
                postings.get(&record.posting_id).map(|posting| InterestedPosting {
                    title: posting.display_title().to_string(),
                    company: posting.company.clone(),
                    interacted_at: record.created_at,
                })
            });
            signal.recent_interests = merge_interests(joined.chain(signal.recent_interests));
        }

        debug!(
            %user_id,
            interests = signal.recent_interests.len(),
            has_signal = signal.has_signal(),
            "User signal loaded"
        );
        Ok(Some(signal))
    }
}

/// Newest first, one entry per (title, company), capped.
fn merge_interests(items: impl Iterator<Item = InterestedPosting>) -> Vec<InterestedPosting> {
    let mut items: Vec<InterestedPosting> = items.collect();
    items.sort_by(|a, b| b.interacted_at.cmp(&a.interacted_at));

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert((item.title.to_lowercase(), item.company.to_lowercase())));
    items.truncate(MAX_INTEREST_SIGNALS);
    items
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostingId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a user expressed interest in a posting.
pub enum InterestKind {
    /// Bookmarked; may carry an expiry.
    Saved,
    /// Applied; never expires.
    Applied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A saved/applied record from the interest history.
///
/// Any record referencing a posting protects that posting from the retention sweep.
pub struct InterestRecord {
    pub user_id: UserId,
    pub posting_id: PostingId,
    pub kind: InterestKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl InterestRecord {
    /// Returns `true` for a saved record whose expiry has passed.
    ///
    /// Applied records are permanent regardless of `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.kind, self.expires_at) {
            (InterestKind::Saved, Some(expires_at)) => expires_at < now,
            _ => false,
        }
    }
}

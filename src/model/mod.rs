//! Persisted and consumed entities.
//!
//! Loosely-typed inputs (free-text seniority, remote hints, source strings) are parsed
//! into enums at the ingestion edge so nothing past [`crate::text`] sees untyped data.

mod ids;
mod interest;
mod posting;
mod score;
mod signal;

pub use ids::{PostingId, UserId};
pub use interest::{InterestKind, InterestRecord};
pub use posting::{
    JobType, Posting, PostingCandidate, PostingSource, ProcessingStatus, RemoteType,
};
pub use score::{MatchScore, RecommendationSnapshot, SubScores, round_score};
pub use signal::{ExperienceEntry, InterestedPosting, Seniority, UserSignal, WorkMode};

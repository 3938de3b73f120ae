//! Job-posting matching library (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`Deduplicator`] - Admits scraped candidates, rejecting malformed input and re-posts
//! - [`Matcher`], [`SignalLoader`] - Screens, scores and ranks postings for one user
//! - [`SnapshotGenerator`] - Builds each user's recommendation snapshot
//! - [`ExpirySweeper`], [`Scheduler`] - Retention sweeps and periodic runs
//! - [`RecommendationService`] - Read operations and trigger hooks behind the gateway
//!
//! ## Scoring
//! - [`SemanticScorer`] - Cached document embeddings and cosine similarity
//! - [`MatchProfile`] - Rule-based eligibility and score adjustment
//! - [`MatchScoreCache`] - TTL'd per-(user, posting) score rows
//!
//! ## Storage
//! - [`PostingStore`], [`MatchScoreStore`], [`SnapshotStore`], [`ProfileSource`],
//!   [`InterestStore`] - Storage seams, all implemented by [`MemoryStore`]
//!
//! ## Test/Mock Support
//! Mock implementations and builders are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod heuristics;
pub mod ingest;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod text;

#[cfg(any(test, feature = "mock"))]
pub mod fixtures;

pub use cache::{MATCH_STATUS_HEADER, MatchScoreCache, MatchStatus};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbeddingConfig, EmbeddingError, EmbeddingProvider, HttpEmbeddingProvider, ProviderChain,
    StubEmbedder,
};
pub use heuristics::MatchProfile;
pub use ingest::{Admission, Deduplicator, IngestReport, RejectReason};
pub use lifecycle::{ExpirySweeper, ScheduleConfig, Scheduler, ShutdownSignal, SweepReport};
pub use model::{
    InterestKind, InterestRecord, MatchScore, Posting, PostingCandidate, PostingId,
    RecommendationSnapshot, UserId, UserSignal,
};
pub use pipeline::{MatchError, MatchRequest, Matcher, MatchingConfig, ScoredPosting, SignalLoader};
pub use scoring::{ScoringError, SemanticScorer};
pub use service::{MatchList, Page, Recommendation, RecommendationService, ServiceError};
pub use snapshot::{GenerationError, GenerationStats, SnapshotGenerator, SnapshotSettings};
pub use store::{
    InterestStore, MatchScoreStore, MemoryStore, PostingStore, ProfileSource, SeedData,
    SnapshotStore, StoreError,
};

//! Filter → score → boost over a bounded candidate set.
//!
//! [`Matcher`] is shared by the snapshot generator and the on-demand path in
//! [`crate::service`]; [`SignalLoader`] assembles the [`crate::model::UserSignal`] it
//! consumes from the profile and interest sources.

pub mod config;
mod error;
mod matcher;
mod signal;


pub use config::MatchingConfig;
pub use error::MatchError;
pub use matcher::{DEFAULT_SCORING_CONCURRENCY, MatchOutcome, MatchRequest, Matcher, ScoredPosting};
pub use signal::SignalLoader;

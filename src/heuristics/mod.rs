//! Heuristic filtering and boosting on top of the semantic score.
//!
//! Order of operations per candidate: category filter ([`is_eligible`], before any
//! embedding call), then the per-user exclusions in [`screen`] (excluded keywords,
//! stack mismatch, alignment gate), then title/skill boosts in [`adjust`].

mod booster;
mod category;
mod profile;
mod reasons;
pub mod terms;


pub use booster::{
    Adjustment, Exclusion, ScoredMatch, adjust, is_eligible_for, screen, skill_boost, title_boost,
};
pub use category::{CategoryRejection, classify_title, is_eligible};
pub use profile::MatchProfile;
pub use reasons::score_band;

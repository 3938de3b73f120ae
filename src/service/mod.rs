//! Operations exposed to the rest of the system: paginated recommendations, cache-first
//! matches and the generation/sweep trigger hooks.

mod error;
mod recommendations;


pub use error::ServiceError;
pub use recommendations::{MatchList, Page, Recommendation, RecommendationService};

//! Posting admission: canonical links, normalization and duplicate rejection.

mod dedup;
pub mod normalize;


pub use dedup::{Admission, Deduplicator, IngestReport, RejectReason};
pub use normalize::{canonicalize_link, infer_remote_type, normalize_location, normalize_title};

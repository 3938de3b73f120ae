//! Text representation of users and postings (pure, no I/O).
//!
//! [`represent_user`] and [`represent_posting`] build the compact documents that are
//! embedded by [`crate::scoring`]. [`normalize`] holds the token helpers shared with
//! ingestion and the heuristics.

pub mod normalize;
mod representer;

#[cfg(test)]
mod tests;

pub use normalize::{
    collapse_whitespace, contains_phrase, normalize_term, strip_html, tokenize, truncate_chars,
};
pub use representer::{represent_posting, represent_user};

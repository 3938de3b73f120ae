//! Cross-cutting, shared constants.
//!
//! Caps bound the size of the documents sent to the embedding provider. Score
//! constants define the 0..100 scale shared by the scorer, booster and cache.

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Reasons stored per match score / snapshot row.
pub const MAX_MATCH_REASONS: usize = 5;

pub const MAX_TECHNICAL_SKILLS: usize = 25;
pub const MAX_SOFT_SKILLS: usize = 10;
pub const MAX_PREFERRED_INDUSTRIES: usize = 10;
pub const MAX_PREFERRED_KEYWORDS: usize = 10;
pub const MAX_EXPERIENCE_ENTRIES: usize = 3;
pub const MAX_INTEREST_SIGNALS: usize = 5;

/// Characters of (HTML-stripped) description kept in a posting document.
pub const POSTING_DESCRIPTION_CHARS: usize = 500;

/// Re-posts of the same title at the same company inside this window are duplicates.
pub const DUPLICATE_WINDOW_DAYS: i64 = 30;

pub const TITLE_EXACT_BOOST: f64 = 40.0;
pub const TITLE_CONTAINS_BOOST: f64 = 30.0;
pub const TITLE_OVERLAP_BOOST: f64 = 20.0;
/// Shared non-generic title words needed for the overlap tier.
pub const TITLE_OVERLAP_MIN_WORDS: usize = 2;

pub const SKILL_BOOST_PER_MATCH: f64 = 2.0;
pub const SKILL_BOOST_CAP: f64 = 25.0;
/// Skill terms found in the posting text needed to pass the alignment gate
/// when the title shares nothing with the target roles.
pub const ALIGNMENT_MIN_SKILL_MATCHES: usize = 2;
/// Skill terms at or below this length are matched as whole tokens.
pub const SHORT_TERM_MAX_LEN: usize = 3;

pub const EXCELLENT_MATCH_SCORE: f64 = 85.0;
pub const STRONG_MATCH_SCORE: f64 = 70.0;
pub const GOOD_MATCH_SCORE: f64 = 50.0;

pub const MAX_PAGE_SIZE: usize = 100;

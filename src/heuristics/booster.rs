use std::fmt;

use super::category::{CategoryRejection, classify_title};
use super::profile::{MatchProfile, significant_words};
use super::reasons::build_reasons;
use super::terms::STACK_TERMS;
use crate::constants::{
    ALIGNMENT_MIN_SKILL_MATCHES, MAX_SCORE, SKILL_BOOST_CAP, SKILL_BOOST_PER_MATCH,
    TITLE_CONTAINS_BOOST, TITLE_EXACT_BOOST, TITLE_OVERLAP_BOOST, TITLE_OVERLAP_MIN_WORDS,
};
use crate::model::{Posting, SubScores, round_score};
use crate::text::{collapse_whitespace, contains_phrase, tokenize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a posting was removed from a user's candidate set.
pub enum Exclusion {
    Category(CategoryRejection),
    /// Title contains one of the user's excluded keywords.
    ExcludedKeyword(String),
    /// Title names a stack the user never claimed.
    StackMismatch(String),
    /// Neither the title nor enough skills line up with the user.
    NotAligned,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(CategoryRejection::NonTechnical(term)) => {
                write!(f, "non-technical role ({})", term)
            }
            Self::Category(CategoryRejection::NoTechnicalTerm) => {
                write!(f, "no technical role keyword in title")
            }
            Self::ExcludedKeyword(keyword) => write!(f, "excluded keyword '{}'", keyword),
            Self::StackMismatch(term) => write!(f, "unclaimed stack '{}'", term),
            Self::NotAligned => write!(f, "not aligned with target roles or skills"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// Final score in `[0, 100]`.
    pub score: f64,
    pub reasons: Vec<String>,
    pub sub_scores: SubScores,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Adjustment {
    Scored(ScoredMatch),
    Excluded(Exclusion),
}

/// Runs every exclusion rule for `profile` against `posting`.
pub fn screen(profile: &MatchProfile, posting: &Posting) -> Result<(), Exclusion> {
    let title = posting.display_title();
    classify_title(title).map_err(Exclusion::Category)?;

    let title_tokens = tokenize(title);
    if let Some(keyword) = profile
        .excluded_keywords()
        .iter()
        .find(|keyword| contains_phrase(&title_tokens, keyword))
    {
        return Err(Exclusion::ExcludedKeyword(keyword.clone()));
    }

    if let Some(term) = title_tokens
        .iter()
        .find(|token| STACK_TERMS.contains(&token.as_str()) && !profile.claims_stack(token))
    {
        return Err(Exclusion::StackMismatch(term.clone()));
    }

    if !is_aligned(profile, posting) {
        return Err(Exclusion::NotAligned);
    }
    Ok(())
}

/// Category filter plus every per-user exclusion.
pub fn is_eligible_for(profile: &MatchProfile, posting: &Posting) -> bool {
    screen(profile, posting).is_ok()
}

/// Applies exclusions and boosts to a semantic `base` score.
pub fn adjust(base: f64, profile: &MatchProfile, posting: &Posting) -> Adjustment {
    if let Err(exclusion) = screen(profile, posting) {
        return Adjustment::Excluded(exclusion);
    }

    let title_boost = title_boost(profile, posting.display_title());
    let matched = profile.matched_skills(&posting_text(posting));
    let skill_boost = skill_boost(matched.len());
    let score = round_score((base + title_boost + skill_boost).min(MAX_SCORE));

    let reasons = build_reasons(score, title_boost > 0.0, &matched, profile, posting);
    Adjustment::Scored(ScoredMatch {
        score,
        reasons,
        sub_scores: SubScores {
            semantic: round_score(base),
            title_boost,
            skill_boost,
        },
    })
}

/// Best title tier over all target roles: exact, whole-word containment, or word overlap.
pub fn title_boost(profile: &MatchProfile, title: &str) -> f64 {
    let title = collapse_whitespace(title).to_lowercase();
    let title_tokens = tokenize(&title);
    let title_words = significant_words(&title);

    profile
        .target_roles()
        .iter()
        .zip(profile.target_role_words())
        .map(|(role, role_words)| {
            if *role == title {
                TITLE_EXACT_BOOST
            } else if contains_phrase(&title_tokens, role)
                || contains_phrase(&tokenize(role), &title)
            {
                TITLE_CONTAINS_BOOST
            } else if title_words.intersection(role_words).count() >= TITLE_OVERLAP_MIN_WORDS {
                TITLE_OVERLAP_BOOST
            } else {
                0.0
            }
        })
        .fold(0.0, f64::max)
}

pub fn skill_boost(matches: usize) -> f64 {
    (matches as f64 * SKILL_BOOST_PER_MATCH).min(SKILL_BOOST_CAP)
}

fn is_aligned(profile: &MatchProfile, posting: &Posting) -> bool {
    let title_words = significant_words(posting.display_title());
    let shares_title_word = profile
        .target_role_words()
        .iter()
        .any(|role_words| !title_words.is_disjoint(role_words));
    shares_title_word
        || profile.matched_skills(&posting_text(posting)).len() >= ALIGNMENT_MIN_SKILL_MATCHES
}

fn posting_text(posting: &Posting) -> String {
    format!("{} {}", posting.display_title(), posting.description)
}

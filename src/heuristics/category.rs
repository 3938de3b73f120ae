use super::terms::{NON_TECHNICAL_TITLE_TERMS, TECHNICAL_TITLE_TERMS};
use crate::model::Posting;
use crate::text::{contains_phrase, tokenize};

/// Why a title failed the category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRejection {
    NonTechnical(&'static str),
    NoTechnicalTerm,
}

/// Checks a title against the fixed role vocabularies.
pub fn classify_title(title: &str) -> Result<(), CategoryRejection> {
    let tokens = tokenize(title);
    if let Some(term) = NON_TECHNICAL_TITLE_TERMS
        .iter()
        .find(|term| contains_phrase(&tokens, term))
    {
        return Err(CategoryRejection::NonTechnical(*term));
    }
    if !TECHNICAL_TITLE_TERMS
        .iter()
        .any(|term| contains_phrase(&tokens, term))
    {
        return Err(CategoryRejection::NoTechnicalTerm);
    }
    Ok(())
}

/// Pre-filter run before any embedding call: technical roles only.
pub fn is_eligible(posting: &Posting) -> bool {
    classify_title(posting.display_title()).is_ok()
}

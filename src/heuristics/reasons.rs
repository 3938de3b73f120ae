use crate::constants::{
    EXCELLENT_MATCH_SCORE, GOOD_MATCH_SCORE, MAX_MATCH_REASONS, STRONG_MATCH_SCORE,
};
use crate::model::Posting;
use crate::text::tokenize;

use super::profile::MatchProfile;

/// Skills listed in a single "Skills match" reason.
const MAX_LISTED_SKILLS: usize = 5;

pub fn score_band(score: f64) -> &'static str {
    if score >= EXCELLENT_MATCH_SCORE {
        "Excellent match"
    } else if score >= STRONG_MATCH_SCORE {
        "Strong match"
    } else if score >= GOOD_MATCH_SCORE {
        "Good match"
    } else {
        "Potential match"
    }
}

/// Reasons in order of importance, at most [`MAX_MATCH_REASONS`].
pub(crate) fn build_reasons(
    score: f64,
    title_aligned: bool,
    matched_skills: &[&str],
    profile: &MatchProfile,
    posting: &Posting,
) -> Vec<String> {
    let mut reasons = vec![score_band(score).to_string()];

    if title_aligned {
        reasons.push("Title aligns with your target roles".to_string());
    }
    if !matched_skills.is_empty() {
        let listed: Vec<&str> = matched_skills.iter().take(MAX_LISTED_SKILLS).copied().collect();
        reasons.push(format!("Skills match: {}", listed.join(", ")));
    }
    if profile.work_mode().matches(posting.remote_type) {
        reasons.push("Matches your remote preference".to_string());
    }
    if let Some(seniority) = profile.seniority() {
        let title_tokens = tokenize(posting.display_title());
        if seniority
            .title_markers()
            .iter()
            .any(|marker| title_tokens.iter().any(|t| t.as_str() == *marker))
        {
            reasons.push("Matches your seniority level".to_string());
        }
    }

    reasons.truncate(MAX_MATCH_REASONS);
    reasons
}

use std::collections::HashSet;

use super::terms::{GENERIC_TITLE_WORDS, STACK_ALIASES};
use crate::constants::SHORT_TERM_MAX_LEN;
use crate::model::{Seniority, UserSignal, WorkMode};
use crate::text::{collapse_whitespace, normalize_term, tokenize};

/// A user's signal pre-digested for per-posting heuristics.
///
/// Built once per user per run so scoring a candidate set does no repeated parsing.
#[derive(Debug, Clone)]
pub struct MatchProfile {
    /// Target roles, lowercased with whitespace collapsed.
    target_roles: Vec<String>,
    /// Non-generic words of each target role.
    target_role_words: Vec<HashSet<String>>,
    /// Skill/tool/keyword terms in the user's spelling.
    skill_terms: Vec<String>,
    /// Normalized skill terms and their individual words, for the stack check.
    claimed_stack: HashSet<String>,
    excluded_keywords: Vec<String>,
    seniority: Option<Seniority>,
    work_mode: WorkMode,
}

impl MatchProfile {
    pub fn from_signal(signal: &UserSignal) -> Self {
        let target_roles: Vec<String> = signal
            .target_roles
            .iter()
            .map(|role| collapse_whitespace(role).to_lowercase())
            .filter(|role| !role.is_empty())
            .collect();
        let target_role_words = target_roles.iter().map(|r| significant_words(r)).collect();

        let skill_terms = signal.skill_terms();
        let mut claimed_stack = HashSet::new();
        for term in &skill_terms {
            claimed_stack.insert(normalize_term(term));
            claimed_stack.extend(tokenize(term).iter().map(|t| normalize_term(t)));
        }
        claimed_stack.remove("");

        let excluded_keywords = signal
            .excluded_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            target_roles,
            target_role_words,
            skill_terms,
            claimed_stack,
            excluded_keywords,
            seniority: signal.seniority,
            work_mode: signal.work_mode,
        }
    }

    pub fn target_roles(&self) -> &[String] {
        &self.target_roles
    }

    pub(crate) fn target_role_words(&self) -> &[HashSet<String>] {
        &self.target_role_words
    }

    pub fn skill_terms(&self) -> &[String] {
        &self.skill_terms
    }

    pub fn excluded_keywords(&self) -> &[String] {
        &self.excluded_keywords
    }

    pub fn seniority(&self) -> Option<Seniority> {
        self.seniority
    }

    pub fn work_mode(&self) -> WorkMode {
        self.work_mode
    }

    /// Returns `true` if the user claimed `stack_term` (or an alias of it).
    pub fn claims_stack(&self, stack_term: &str) -> bool {
        let normalized = normalize_term(stack_term);
        if self.claimed_stack.contains(&normalized) {
            return true;
        }
        STACK_ALIASES.iter().any(|(a, b)| {
            (normalized == *a && self.claimed_stack.contains(*b))
                || (normalized == *b && self.claimed_stack.contains(*a))
        })
    }

    /// Skill terms found in `text`, in the user's spelling and order.
    ///
    /// Short terms (`go`, `aws`) must match a whole token; longer ones match as substrings.
    pub fn matched_skills(&self, text: &str) -> Vec<&str> {
        let lower = text.to_lowercase();
        let tokens: HashSet<String> = tokenize(text).iter().map(|t| normalize_term(t)).collect();

        self.skill_terms
            .iter()
            .filter(|term| {
                if term.chars().count() <= SHORT_TERM_MAX_LEN {
                    tokens.contains(&normalize_term(term))
                } else {
                    lower.contains(&term.to_lowercase())
                }
            })
            .map(String::as_str)
            .collect()
    }
}

/// Lowercased words of `title` minus generic role words.
pub(crate) fn significant_words(title: &str) -> HashSet<String> {
    tokenize(title)
        .into_iter()
        .filter(|word| !GENERIC_TITLE_WORDS.contains(&word.as_str()))
        .collect()
}

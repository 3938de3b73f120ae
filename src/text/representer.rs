use std::cmp::Reverse;

use crate::constants::{
    MAX_EXPERIENCE_ENTRIES, MAX_INTEREST_SIGNALS, MAX_PREFERRED_INDUSTRIES,
    MAX_PREFERRED_KEYWORDS, MAX_SOFT_SKILLS, MAX_TECHNICAL_SKILLS, POSTING_DESCRIPTION_CHARS,
};
use crate::model::{Posting, UserSignal};

use super::normalize::{collapse_whitespace, strip_html, truncate_chars};

/// Builds the user document embedded once per generation cycle.
///
/// Sections with no data are omitted. Each list is capped so low-signal text cannot
/// dilute the vector.
pub fn represent_user(signal: &UserSignal) -> String {
    let mut sections = Vec::new();

    push_list(&mut sections, "Target roles", &signal.target_roles, usize::MAX);

    if let Some(seniority) = signal.seniority {
        sections.push(format!("Seniority: {}.", seniority.as_str()));
    }

    let technical: Vec<String> = signal
        .technical_skills
        .iter()
        .chain(&signal.tools)
        .cloned()
        .collect();
    push_list(&mut sections, "Technical skills", &technical, MAX_TECHNICAL_SKILLS);
    push_list(&mut sections, "Soft skills", &signal.soft_skills, MAX_SOFT_SKILLS);
    push_list(
        &mut sections,
        "Industries",
        &signal.preferred_industries,
        MAX_PREFERRED_INDUSTRIES,
    );
    push_list(
        &mut sections,
        "Keywords",
        &signal.preferred_keywords,
        MAX_PREFERRED_KEYWORDS,
    );

    let mut experience: Vec<_> = signal.experience.iter().collect();
    // Most recent first; entries without a start date sort last.
    experience.sort_by_key(|entry| Reverse(entry.start_date));
    let experience: Vec<String> = experience
        .into_iter()
        .take(MAX_EXPERIENCE_ENTRIES)
        .map(|entry| match entry.company.as_deref().map(str::trim) {
            Some(company) if !company.is_empty() => format!("{} at {}", entry.title.trim(), company),
            _ => entry.title.trim().to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect();
    if !experience.is_empty() {
        sections.push(format!("Recent experience: {}.", experience.join("; ")));
    }

    let mut interests: Vec<_> = signal.recent_interests.iter().collect();
    interests.sort_by_key(|interest| Reverse(interest.interacted_at));
    let interests: Vec<String> = interests
        .into_iter()
        .take(MAX_INTEREST_SIGNALS)
        .map(|interest| format!("{} at {}", interest.title.trim(), interest.company.trim()))
        .collect();
    if !interests.is_empty() {
        sections.push(format!("Recently interested in: {}.", interests.join("; ")));
    }

    collapse_whitespace(&sections.join(" "))
}

/// Builds the posting document: title, company, remote type, location and a
/// truncated, HTML-stripped description.
pub fn represent_posting(posting: &Posting) -> String {
    let mut sections = vec![format!(
        "{} at {}.",
        posting.display_title().trim(),
        posting.company.trim()
    )];

    if let Some(label) = posting.remote_type.label() {
        sections.push(format!("{}.", label));
    }

    if let Some(location) = posting.display_location().map(str::trim) {
        if !location.is_empty() {
            sections.push(format!("Location: {}.", location));
        }
    }

    let description = strip_html(&posting.description);
    let description = truncate_chars(&description, POSTING_DESCRIPTION_CHARS);
    if !description.is_empty() {
        sections.push(description.to_string());
    }

    collapse_whitespace(&sections.join(" "))
}

fn push_list(sections: &mut Vec<String>, label: &str, items: &[String], cap: usize) {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .take(cap)
        .collect();
    if !items.is_empty() {
        sections.push(format!("{}: {}.", label, items.join(", ")));
    }
}

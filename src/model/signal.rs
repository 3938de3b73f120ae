use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{RemoteType, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    #[serde(alias = "internship")]
    Intern,
    #[serde(alias = "jr", alias = "entry", alias = "graduate")]
    Junior,
    #[serde(alias = "intermediate", alias = "mid-level")]
    Mid,
    #[serde(alias = "sr")]
    Senior,
    #[serde(alias = "staff")]
    Lead,
    Principal,
}

impl Seniority {
    /// Title words that signal this level.
    pub fn title_markers(&self) -> &'static [&'static str] {
        match self {
            Self::Intern => &["intern", "internship", "trainee"],
            Self::Junior => &["junior", "jr", "entry", "graduate", "associate"],
            Self::Mid => &["mid", "intermediate"],
            Self::Senior => &["senior", "sr"],
            Self::Lead => &["lead", "staff"],
            Self::Principal => &["principal", "distinguished"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intern => "intern",
            Self::Junior => "junior",
            Self::Mid => "mid-level",
            Self::Senior => "senior",
            Self::Lead => "lead",
            Self::Principal => "principal",
        }
    }
}

impl FromStr for Seniority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intern" | "internship" => Ok(Self::Intern),
            "junior" | "jr" | "entry" | "entry-level" | "graduate" => Ok(Self::Junior),
            "mid" | "mid-level" | "intermediate" => Ok(Self::Mid),
            "senior" | "sr" => Ok(Self::Senior),
            "lead" | "staff" => Ok(Self::Lead),
            "principal" => Ok(Self::Principal),
            other => Err(format!("Unknown seniority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Preferred work arrangement.
pub enum WorkMode {
    Remote,
    Hybrid,
    #[serde(alias = "on-site", alias = "office")]
    Onsite,
    #[default]
    Flexible,
}

impl WorkMode {
    /// Returns `true` when the posting's arrangement is the one the user asked for.
    ///
    /// `Flexible` expresses no preference and never matches.
    pub fn matches(&self, remote_type: RemoteType) -> bool {
        matches!(
            (self, remote_type),
            (Self::Remote, RemoteType::Remote)
                | (Self::Hybrid, RemoteType::Hybrid)
                | (Self::Onsite, RemoteType::Onsite)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A posting the user recently saved or applied to (weak interest signal).
pub struct InterestedPosting {
    pub title: String,
    pub company: String,
    pub interacted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Read-only user profile/résumé/interest signal.
pub struct UserSignal {
    pub user_id: UserId,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub seniority: Option<Seniority>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    #[serde(default)]
    pub preferred_keywords: Vec<String>,
    #[serde(default)]
    pub excluded_keywords: Vec<String>,
    #[serde(default)]
    pub work_mode: WorkMode,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub recent_interests: Vec<InterestedPosting>,
    /// Last profile change; cached scores older than this are stale.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl UserSignal {
    /// Empty signal for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            target_roles: Vec::new(),
            seniority: None,
            technical_skills: Vec::new(),
            soft_skills: Vec::new(),
            tools: Vec::new(),
            preferred_industries: Vec::new(),
            preferred_keywords: Vec::new(),
            excluded_keywords: Vec::new(),
            work_mode: WorkMode::default(),
            experience: Vec::new(),
            recent_interests: Vec::new(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Returns `true` if any profile, résumé or interest source is populated.
    pub fn has_signal(&self) -> bool {
        let populated = |items: &[String]| items.iter().any(|s| !s.trim().is_empty());
        populated(&self.target_roles)
            || populated(&self.technical_skills)
            || populated(&self.tools)
            || populated(&self.preferred_keywords)
            || populated(&self.soft_skills)
            || populated(&self.preferred_industries)
            || !self.experience.is_empty()
            || !self.recent_interests.is_empty()
    }

    /// Technical skills, tools and preferred keywords, trimmed and deduplicated
    /// case-insensitively (first spelling wins).
    pub fn skill_terms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.technical_skills
            .iter()
            .chain(&self.tools)
            .chain(&self.preferred_keywords)
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .filter(|term| seen.insert(term.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

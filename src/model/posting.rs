use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PostingId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Where a posting came from.
pub enum PostingSource {
    /// Scraped from a job board (the board's name, lowercased).
    Board(String),
    /// Added manually by a user; exempt from the retention sweep.
    External,
}

impl PostingSource {
    /// Source tag used for user-added postings.
    pub const EXTERNAL: &'static str = "external";

    /// Returns `true` for manually added postings.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }

    /// Returns the source tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Board(name) => name,
            Self::External => Self::EXTERNAL,
        }
    }
}

impl From<String> for PostingSource {
    fn from(value: String) -> Self {
        let value = value.trim().to_lowercase();
        if value == Self::EXTERNAL {
            Self::External
        } else {
            Self::Board(value)
        }
    }
}

impl From<&str> for PostingSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PostingSource> for String {
    fn from(source: PostingSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for PostingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Unknown,
}

impl RemoteType {
    /// Human label used in posting documents; `None` when unknown.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Remote => Some("Remote"),
            Self::Hybrid => Some("Hybrid"),
            Self::Onsite => Some("On-site"),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A deduplicated job listing. `link` is the canonical natural key.
pub struct Posting {
    pub id: PostingId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    pub link: String,
    pub source: PostingSource,
    pub posted_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    #[serde(default)]
    pub normalized_title: Option<String>,
    #[serde(default)]
    pub normalized_location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub remote_type: RemoteType,
    #[serde(default)]
    pub processing_status: ProcessingStatus,
}

impl Posting {
    /// Normalized title when enrichment has run, raw title otherwise.
    pub fn display_title(&self) -> &str {
        self.normalized_title.as_deref().unwrap_or(&self.title)
    }

    /// Normalized location when available, raw location otherwise.
    pub fn display_location(&self) -> Option<&str> {
        self.normalized_location
            .as_deref()
            .or(self.location.as_deref())
    }

    /// Postings past ingestion that may be offered to users.
    pub fn is_active(&self) -> bool {
        self.processing_status != ProcessingStatus::Archived
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Raw posting as supplied by ingestion, before deduplication.
pub struct PostingCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub remote_type: Option<RemoteType>,
}

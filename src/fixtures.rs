//! Builders for postings and user signals used by unit and integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::model::{
    ExperienceEntry, InterestKind, InterestRecord, InterestedPosting, JobType, Posting,
    PostingCandidate, PostingId, PostingSource, ProcessingStatus, RemoteType, Seniority, UserId,
    UserSignal, WorkMode,
};

/// Fixed reference time (2025-06-01T12:00:00Z) so fixtures are deterministic.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

pub struct PostingBuilder {
    posting: Posting,
}

impl PostingBuilder {
    pub fn new(title: &str, company: &str) -> Self {
        let id = PostingId::new();
        Self {
            posting: Posting {
                id,
                title: title.to_string(),
                company: company.to_string(),
                location: None,
                description: String::new(),
                link: format!("https://jobs.example.com/{}", id),
                source: PostingSource::Board("example".into()),
                posted_at: fixed_now(),
                scraped_at: fixed_now(),
                normalized_title: None,
                normalized_location: None,
                job_type: JobType::FullTime,
                remote_type: RemoteType::Unknown,
                processing_status: ProcessingStatus::Processed,
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.posting.description = description.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.posting.location = Some(location.to_string());
        self
    }

    pub fn link(mut self, link: &str) -> Self {
        self.posting.link = link.to_string();
        self
    }

    pub fn external(mut self) -> Self {
        self.posting.source = PostingSource::External;
        self
    }

    pub fn remote_type(mut self, remote_type: RemoteType) -> Self {
        self.posting.remote_type = remote_type;
        self
    }

    pub fn posted_days_ago(mut self, days: i64) -> Self {
        self.posting.posted_at = fixed_now() - Duration::days(days);
        self.posting.scraped_at = self.posting.posted_at;
        self
    }

    pub fn posted_at(mut self, at: DateTime<Utc>) -> Self {
        self.posting.posted_at = at;
        self.posting.scraped_at = at;
        self
    }

    pub fn status(mut self, status: ProcessingStatus) -> Self {
        self.posting.processing_status = status;
        self
    }

    pub fn build(self) -> Posting {
        self.posting
    }
}

pub struct SignalBuilder {
    signal: UserSignal,
}

impl SignalBuilder {
    pub fn new() -> Self {
        Self {
            signal: UserSignal::new(UserId::new()),
        }
    }

    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.signal.user_id = user_id;
        self
    }

    pub fn target_roles(mut self, roles: &[&str]) -> Self {
        self.signal.target_roles = roles.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn skills(mut self, skills: &[&str]) -> Self {
        self.signal.technical_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn soft_skills(mut self, skills: &[&str]) -> Self {
        self.signal.soft_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tools(mut self, tools: &[&str]) -> Self {
        self.signal.tools = tools.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.signal.preferred_keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn excluded(mut self, keywords: &[&str]) -> Self {
        self.signal.excluded_keywords = keywords.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn seniority(mut self, seniority: Seniority) -> Self {
        self.signal.seniority = Some(seniority);
        self
    }

    pub fn work_mode(mut self, work_mode: WorkMode) -> Self {
        self.signal.work_mode = work_mode;
        self
    }

    pub fn experience(mut self, title: &str, company: &str, start_year: i32) -> Self {
        self.signal.experience.push(ExperienceEntry {
            title: title.to_string(),
            company: Some(company.to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(start_year, 1, 1),
            end_date: None,
        });
        self
    }

    pub fn interest(mut self, title: &str, company: &str, days_ago: i64) -> Self {
        self.signal.recent_interests.push(InterestedPosting {
            title: title.to_string(),
            company: company.to_string(),
            interacted_at: fixed_now() - Duration::days(days_ago),
        });
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.signal.updated_at = at;
        self
    }

    pub fn build(self) -> UserSignal {
        self.signal
    }
}

impl Default for SignalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate with the given title/company/link posted at [`fixed_now`].
pub fn candidate(title: &str, company: &str, link: &str) -> PostingCandidate {
    PostingCandidate {
        title: title.to_string(),
        company: company.to_string(),
        link: link.to_string(),
        source: "example".to_string(),
        description: format!("{} role at {}", title, company),
        posted_at: Some(fixed_now()),
        ..PostingCandidate::default()
    }
}

pub fn interest(
    user_id: UserId,
    posting_id: PostingId,
    kind: InterestKind,
    expires_at: Option<DateTime<Utc>>,
) -> InterestRecord {
    InterestRecord {
        user_id,
        posting_id,
        kind,
        created_at: fixed_now(),
        expires_at,
    }
}

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};

use super::normalize::{canonicalize_link, infer_remote_type, normalize_location, normalize_title};
use crate::clock::Clock;
use crate::constants::DUPLICATE_WINDOW_DAYS;
use crate::model::{
    Posting, PostingCandidate, PostingId, PostingSource, ProcessingStatus, RemoteType,
};
use crate::store::{PostingStore, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a candidate was not admitted.
pub enum RejectReason {
    MissingTitle,
    MissingLink,
    /// A posting with the same canonical link exists.
    DuplicateLink { existing: PostingId },
    /// Same company, overlapping title and posted within the duplicate window.
    ProbableDuplicate { existing: PostingId },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "missing title"),
            Self::MissingLink => write!(f, "missing link"),
            Self::DuplicateLink { existing } => write!(f, "duplicate link (posting {})", existing),
            Self::ProbableDuplicate { existing } => {
                write!(f, "probable re-post of posting {}", existing)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Accepted(Posting),
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

/// Admits candidates from ingestion, rejecting malformed input and duplicates.
pub struct Deduplicator {
    postings: Arc<dyn PostingStore>,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl Deduplicator {
    pub fn new(postings: Arc<dyn PostingStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            postings,
            clock,
            window: Duration::days(DUPLICATE_WINDOW_DAYS),
        }
    }

    /// Checks `candidate` and returns the normalized posting it would become.
    ///
    /// Does not write; see [`Deduplicator::ingest`].
    pub async fn admit(&self, candidate: PostingCandidate) -> StoreResult<Admission> {
        let title = candidate.title.trim();
        if title.is_empty() {
            return Ok(Admission::Rejected(RejectReason::MissingTitle));
        }
        let Some(link) = canonicalize_link(&candidate.link) else {
            return Ok(Admission::Rejected(RejectReason::MissingLink));
        };

        if let Some(existing) = self.postings.find_by_link(&link).await? {
            return Ok(Admission::Rejected(RejectReason::DuplicateLink {
                existing: existing.id,
            }));
        }

        let now = self.clock.now();
        let posted_at = candidate.posted_at.unwrap_or(now);
        let location = candidate
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let normalized_title = normalize_title(title, location);

        if let Some(existing) = self
            .find_probable_duplicate(&candidate.company, &normalized_title, posted_at)
            .await?
        {
            return Ok(Admission::Rejected(RejectReason::ProbableDuplicate {
                existing,
            }));
        }

        let remote_type = match candidate.remote_type {
            Some(remote_type) if remote_type != RemoteType::Unknown => remote_type,
            _ => infer_remote_type(title, location),
        };
        let source = match candidate.source.trim() {
            "" => PostingSource::Board("unknown".to_string()),
            source => PostingSource::from(source),
        };

        Ok(Admission::Accepted(Posting {
            id: PostingId::new(),
            title: title.to_string(),
            company: candidate.company.trim().to_string(),
            location: location.map(str::to_string),
            description: candidate.description,
            link,
            source,
            posted_at,
            scraped_at: now,
            normalized_title: Some(normalized_title),
            normalized_location: normalize_location(location),
            job_type: candidate.job_type.unwrap_or_default(),
            remote_type,
            processing_status: ProcessingStatus::Processed,
        }))
    }

    /// Admits and, on acceptance, stores the posting.
    ///
    /// A concurrent insert of the same link surfaces as a duplicate rejection.
    #[instrument(skip(self, candidate), fields(title = %candidate.title))]
    pub async fn ingest(&self, candidate: PostingCandidate) -> StoreResult<Admission> {
        let posting = match self.admit(candidate).await? {
            Admission::Accepted(posting) => posting,
            Admission::Rejected(reason) => {
                debug!(%reason, "Posting rejected");
                return Ok(Admission::Rejected(reason));
            }
        };

        match self.postings.insert(posting.clone()).await {
            Ok(()) => {
                debug!(posting_id = %posting.id, link = %posting.link, "Posting admitted");
                Ok(Admission::Accepted(posting))
            }
            Err(StoreError::DuplicateLink { link }) => {
                let existing = self.postings.find_by_link(&link).await?;
                Ok(Admission::Rejected(RejectReason::DuplicateLink {
                    existing: existing.map(|p| p.id).unwrap_or(posting.id),
                }))
            }
            Err(e) => Err(e),
        }
    }

    /// Ingests candidates in order, counting outcomes. Stops on the first storage error.
    pub async fn ingest_batch(
        &self,
        candidates: impl IntoIterator<Item = PostingCandidate>,
    ) -> StoreResult<IngestReport> {
        let mut report = IngestReport::default();
        for candidate in candidates {
            match self.ingest(candidate).await? {
                Admission::Accepted(_) => report.accepted += 1,
                Admission::Rejected(RejectReason::MissingTitle | RejectReason::MissingLink) => {
                    report.malformed += 1
                }
                Admission::Rejected(_) => report.duplicates += 1,
            }
        }
        info!(
            accepted = report.accepted,
            duplicates = report.duplicates,
            malformed = report.malformed,
            "Ingest batch complete"
        );
        Ok(report)
    }

    async fn find_probable_duplicate(
        &self,
        company: &str,
        normalized_title: &str,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<Option<PostingId>> {
        if company.trim().is_empty() {
            return Ok(None);
        }
        let title = normalized_title.to_lowercase();

        let existing = self.postings.find_by_company(company).await?;
        Ok(existing
            .into_iter()
            .filter(|p| (p.posted_at - posted_at).abs() <= self.window)
            .find(|p| titles_overlap(&title, &p.display_title().to_lowercase()))
            .map(|p| p.id))
    }
}

fn titles_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

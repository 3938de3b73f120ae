use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::EmbeddingProvider;
use super::error::EmbeddingError;

/// Scriptable provider for tests.
///
/// Returns the vector of the first rule whose needle occurs in the text (case-insensitive),
/// else the default vector, else [`EmbeddingError::EmptyVector`].
#[derive(Debug)]
pub struct MockEmbedder {
    name: String,
    rules: Vec<(String, Vec<f32>)>,
    default: Option<Vec<f32>>,
    fail_needles: Vec<String>,
    status: Option<u16>,
    delay: Option<Duration>,
    failing: AtomicBool,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            rules: Vec::new(),
            default: None,
            fail_needles: Vec::new(),
            status: None,
            delay: None,
            failing: AtomicBool::new(false),
            failures_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_rule(mut self, needle: &str, vector: Vec<f32>) -> Self {
        self.rules.push((needle.to_lowercase(), vector));
        self
    }

    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.default = Some(vector);
        self
    }

    /// Texts containing `needle` fail with a retryable error.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_needles.push(needle.to_lowercase());
        self
    }

    /// Every call fails with an HTTP status error carrying `status`.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every call fail with a retryable error until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// The next `n` calls fail with a retryable error.
    pub fn fail_next(&self, n: usize) {
        self.failures_left.store(n, Ordering::Release);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    fn unreachable(&self) -> EmbeddingError {
        EmbeddingError::Unreachable {
            provider: self.name.clone(),
            reason: "mock failure".to_string(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::Acquire) {
            return Err(self.unreachable());
        }
        let scheduled = self
            .failures_left
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if scheduled.is_ok() {
            return Err(self.unreachable());
        }
        if let Some(status) = self.status {
            return Err(EmbeddingError::Status {
                provider: self.name.clone(),
                status,
                body: "mock status".to_string(),
            });
        }

        let lower = text.to_lowercase();
        if self.fail_needles.iter().any(|needle| lower.contains(needle)) {
            return Err(self.unreachable());
        }
        self.rules
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, vector)| vector.clone())
            .or_else(|| self.default.clone())
            .ok_or_else(|| EmbeddingError::EmptyVector {
                provider: self.name.clone(),
            })
    }
}

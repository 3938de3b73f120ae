use std::sync::Arc;

use crate::lifecycle::ShutdownSignal;
use crate::service::RecommendationService;

#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<RecommendationService>,

    pub shutdown: ShutdownSignal,

    /// `"stub"` or `"remote"`, reported by the health endpoint.
    pub embedder_mode: &'static str,
}

impl HandlerState {
    pub fn new(
        service: Arc<RecommendationService>,
        shutdown: ShutdownSignal,
        stub_embedder: bool,
    ) -> Self {
        Self {
            service,
            shutdown,
            embedder_mode: if stub_embedder { "stub" } else { "remote" },
        }
    }
}

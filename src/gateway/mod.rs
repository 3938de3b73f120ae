//! HTTP gateway (Axum) over [`crate::service`].
//!
//! Read endpoints serve recommendations and matches; the admin endpoints expose the
//! generation and sweep trigger hooks.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    get_matches_handler, get_recommendations_handler, run_generation_handler, run_sweep_handler,
};
pub use state::HandlerState;

pub const HEALTH_STATUS_HEALTHY: &str = "healthy";
pub const HEALTH_STATUS_DEGRADED: &str = "degraded";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/v1/users/{user_id}/recommendations",
            get(get_recommendations_handler),
        )
        .route("/v1/users/{user_id}/matches", get(get_matches_handler))
        .route("/v1/admin/generation", post(run_generation_handler))
        .route("/v1/admin/sweep", post(run_sweep_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub embedder_mode: &'static str,
}

/// `healthy`, or `degraded` with 503 once shutdown has begun.
#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let (code, status) = if state.shutdown.is_triggered() {
        (StatusCode::SERVICE_UNAVAILABLE, HEALTH_STATUS_DEGRADED)
    } else {
        (StatusCode::OK, HEALTH_STATUS_HEALTHY)
    };

    (
        code,
        Json(HealthResponse {
            status,
            embedder_mode: state.embedder_mode,
        }),
    )
        .into_response()
}

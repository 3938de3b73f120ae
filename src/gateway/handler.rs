use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::cache::MATCH_STATUS_HEADER;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::model::UserId;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MATCH_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

fn parse_user_id(raw: &str) -> Result<UserId, GatewayError> {
    raw.parse()
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid user id '{}': {}", raw, e)))
}

#[instrument(skip(state, query))]
pub async fn get_recommendations_handler(
    State(state): State<HandlerState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, GatewayError> {
    let user_id = parse_user_id(&user_id)?;
    let page = state
        .service
        .get_recommendations(
            user_id,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    debug!(total = page.total, returned = page.items.len(), "Recommendations served");
    Ok(Json(page).into_response())
}

/// Cache-first matches; `X-Match-Status` reports `HIT` or `MISS`.
#[instrument(skip(state, query))]
pub async fn get_matches_handler(
    State(state): State<HandlerState>,
    Path(user_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Response, GatewayError> {
    let user_id = parse_user_id(&user_id)?;
    let list = state
        .service
        .get_or_compute_matches(user_id, query.limit.unwrap_or(DEFAULT_MATCH_LIMIT))
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        MATCH_STATUS_HEADER,
        HeaderValue::from_static(list.status.as_header_value()),
    );
    Ok((headers, Json(list)).into_response())
}

#[instrument(skip(state))]
pub async fn run_generation_handler(
    State(state): State<HandlerState>,
) -> Result<Response, GatewayError> {
    if state.shutdown.is_triggered() {
        return Err(GatewayError::ShuttingDown);
    }
    let stats = state.service.run_generation().await?;
    Ok(Json(stats).into_response())
}

#[instrument(skip(state))]
pub async fn run_sweep_handler(State(state): State<HandlerState>) -> Result<Response, GatewayError> {
    let report = state.service.run_sweep().await?;
    Ok(Json(report).into_response())
}

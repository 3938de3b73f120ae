use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("server is shutting down")]
    ShuttingDown,
}

impl From<ServiceError> for GatewayError {
    fn from(error: ServiceError) -> Self {
        use crate::pipeline::MatchError;
        use crate::snapshot::GenerationError;

        match &error {
            ServiceError::UserNotFound { .. } => Self::NotFound(error.to_string()),
            ServiceError::Store(_)
            | ServiceError::Matching(MatchError::Store(_))
            | ServiceError::Generation(GenerationError::Persistence(_))
            | ServiceError::Sweep(_) => Self::StorageError(error.to_string()),
            ServiceError::Matching(MatchError::UserEmbedding(_)) => {
                Self::EmbeddingFailed(error.to_string())
            }
            ServiceError::Generation(_) => Self::InternalError(error.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::EmbeddingFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::StorageError(_) | GatewayError::ShuttingDown => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

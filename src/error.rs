use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracker_core::{DbError, ParamsError};

/// Errors surfaced by the HTTP and MCP layers.
///
/// Payloads are plain strings so one outcome can be handed to every caller
/// that joined a coalesced submission.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("submission cancelled: server is shutting down")]
    Cancelled,
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => AppError::NotFound(what),
            DbError::Validation(msg) => AppError::Validation(msg),
            other => {
                tracing::error!("Database failure: {}", other);
                AppError::BackendUnavailable(other.to_string())
            }
        }
    }
}

impl From<ParamsError> for AppError {
    fn from(err: ParamsError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BackendUnavailable(_) | AppError::Cancelled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

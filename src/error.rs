use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to HTTP clients. Storage faults on reads never reach this
/// type; the store logs them and degrades to an empty catalog instead. A
/// refused mutation surfaces as `Storage`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        // The store already logged the cause, including the data file path.
        let message = match self {
            AppError::Storage(StoreError::Unreadable(_)) => {
                "the catalog could not be read, nothing was changed".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: kind.to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

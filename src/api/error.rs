/// HTTP error mapping
///
/// Translates core errors into status codes and a small JSON body:
/// `{ "error": "...", "code": "..." }`.

use crate::error::{ValidationError, WorkflowError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid payload (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing entity (404)
    #[error("{0}")]
    NotFound(String),

    /// Storage or other infrastructure failure (500)
    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(e) => e.into(),
            WorkflowError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            WorkflowError::Storage(e) => {
                // Details stay in the log
                tracing::error!("❌ Storage failure: {:#}", e);
                ApiError::Internal("internal storage error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

//! Error types for speakcheck-web
//!
//! JSON endpoints answer failures with `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::AssessmentClientError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or expired session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Assessment service answered with a non-success status (500)
    #[error("API Error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// Storage or configuration failure (500)
    #[error(transparent)]
    Common(#[from] speakcheck_common::Error),
}

impl From<AssessmentClientError> for ApiError {
    fn from(err: AssessmentClientError) -> Self {
        match err {
            AssessmentClientError::Upstream { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } | ApiError::Internal(_) | ApiError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

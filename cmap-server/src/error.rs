//! Error types for cmap-server
//!
//! Client-caused failures map to 400, server-caused failures to 500. Every
//! error body is `{"error": <message>, "code": <code>}`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::pipeline::PipelineError;
use crate::render::RenderError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed upload request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload parsed but its contents are unusable (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Map could not be produced from the data (500)
    #[error("Render failed: {0}")]
    Render(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Multipart stream could not be decoded (400)
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Schema { .. } | PipelineError::Csv(_) => {
                ApiError::Validation(err.to_string())
            }
            PipelineError::Render(RenderError::Serialize(e)) => ApiError::Internal(e.to_string()),
            PipelineError::Render(e) => ApiError::Render(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::Render(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Multipart(ref err) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.body_text()),
        };

        if status.is_server_error() {
            error!(code = error_code, "{}", message);
        } else {
            warn!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_validation() {
        let err: ApiError = PipelineError::Schema {
            missing: vec!["image".to_string()],
        }
        .into();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Missing required columns: image"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_render_error_is_server_error() {
        let err: ApiError = PipelineError::Render(RenderError::EmptyTable).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

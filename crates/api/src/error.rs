use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use linemill_core::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error bodies.
/// Only the durable-store path ever surfaces past a handler; cache
/// failures are absorbed inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted request was rejected before any state was created.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A malformed request body (e.g. broken multipart stream).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The durable store failed after exhausting its retry budget.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Store(err) => {
                tracing::error!(error = %err, "durable store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to process the uploaded file.".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

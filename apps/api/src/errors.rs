use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the request that raised it: nothing is retried
/// server-side and no partial report is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTimezone(tz) => (
                StatusCode::BAD_REQUEST,
                "INVALID_TIMEZONE",
                format!("Unknown timezone identifier '{tz}'"),
            ),
            AppError::Classifier(msg) => {
                tracing::error!("Classifier error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CLASSIFIER_ERROR",
                    "Sentiment analysis failed".to_string(),
                )
            }
            AppError::Generator(msg) => {
                tracing::error!("Generator error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATOR_ERROR",
                    "Rewrite generation failed".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

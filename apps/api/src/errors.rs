use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::GenerationError;

/// Shown when the model's answer does not fit the requested schema.
pub const SCHEMA_VALIDATION_MESSAGE: &str = "The AI's response did not match the required format. \
    This can happen with very niche domains. Please try a different one.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::SchemaValidation { schema, reason } => {
                AppError::SchemaValidation(format!("{schema}: {reason}"))
            }
            GenerationError::Llm(e) => AppError::Llm(e.to_string()),
            GenerationError::Template(msg) => {
                AppError::Internal(anyhow::anyhow!("prompt template error: {msg}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::SchemaValidation(detail) => {
                tracing::warn!("Schema validation error: {detail}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SCHEMA_VALIDATION_ERROR",
                    SCHEMA_VALIDATION_MESSAGE.to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
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

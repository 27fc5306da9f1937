use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PricingError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Price table configuration error: {0}")]
    Pricing(#[from] PricingError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Transition failed at step {failed_step} after {completed:?}: {source}")]
    PartialTransition {
        failed_step: String,
        completed: Vec<String>,
        #[source]
        source: Box<AppError>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

// Convert AppError to an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, completed) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string(), None),
            AppError::Pricing(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string(), None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string(), None),
            AppError::PartialTransition {
                failed_step,
                completed,
                ..
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Status change failed at step {}", failed_step),
                Some(completed.clone()),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".into(),
                None,
            ),
            AppError::WebSocket(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "WebSocket error".into(),
                None,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
                None,
            ),
            AppError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "JSON error".into(), None),
        };

        tracing::error!(?self);
        let body = Json(ErrorResponse {
            error: error_message,
            completed_steps: completed,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_steps: Option<Vec<String>>,
}

pub type Result<T> = std::result::Result<T, AppError>;

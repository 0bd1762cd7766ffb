//! Request-level error type.
//!
//! Input and not-found errors carry a message meant for the caller. Upstream
//! failures (generator, store) are logged in full and answered with a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::generator::GenerateError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    NotFound(String),

    #[error("recipe generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status and client-safe message. Logs the cause of upstream failures.
    pub fn report(&self) -> (StatusCode, String) {
        let message = match self {
            AppError::Input(m) | AppError::NotFound(m) => m.clone(),
            AppError::Generation(e) => {
                error!(error = %e, "recipe generation failed");
                "recipe generation failed".to_owned()
            }
            AppError::Store(e) => {
                error!(error = ?e, "store error");
                "internal server error".to_owned()
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "internal server error".to_owned()
            }
        };
        (self.status(), message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.report();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

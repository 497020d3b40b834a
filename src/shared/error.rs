//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Server-side failure detail attached to 5xx responses.
///
/// The client only sees a generic message; the error reporting middleware
/// reads this extension to forward the real cause to Sentry.
#[derive(Debug, Clone)]
pub struct ReportedError(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, reported) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, msg.clone(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 10002, msg.clone(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, 10003, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "Internal server error".into(),
                    Some(msg.clone()),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "Internal server error".into(),
                    Some(e.to_string()),
                )
            }
        };

        let body = ErrorResponse { code, message };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = reported {
            response.extensions_mut().insert(ReportedError(detail));
        }
        response
    }
}

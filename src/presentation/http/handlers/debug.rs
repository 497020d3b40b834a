//! Telemetry check endpoint.

use crate::shared::error::AppError;

/// Always fails, so the error reporting pipeline can be verified end to end.
pub async fn debug_sentry() -> Result<(), AppError> {
    Err(AppError::Internal("Synthetic error from /debug-sentry".into()))
}

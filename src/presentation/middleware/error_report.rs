//! Server error reporting.
//!
//! Forwards 5xx failures to Sentry and turns handler panics into 500
//! responses instead of dropped connections.

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::shared::error::{ErrorResponse, ReportedError};

/// Capture responses tagged with [`ReportedError`] as Sentry events.
pub async fn report_server_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    if let Some(ReportedError(detail)) = response.extensions().get::<ReportedError>() {
        let event_id = sentry::with_scope(
            |scope| {
                scope.set_tag("http.method", method.as_str());
                scope.set_tag("http.path", &path);
            },
            || sentry::capture_message(detail, sentry::Level::Error),
        );
        tracing::error!(
            %method,
            path,
            status = response.status().as_u16(),
            %event_id,
            "Server error reported"
        );
    }

    response
}

/// Response for a panicking handler. The panic itself reaches Sentry through
/// the SDK's panic hook, so the response is not tagged again.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            code: 10000,
            message: "Internal server error".into(),
        }),
    )
        .into_response()
}

//! Sentry error telemetry hooks.

use axum::{extract::Request, middleware};
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::domain::ports::{ErrorTelemetry, Middleware};
use crate::presentation::middleware::{handle_panic, report_server_errors};

/// Default [`ErrorTelemetry`]. Works with or without an initialised client:
/// without one, the hooks are no-ops apart from logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryTelemetry;

impl ErrorTelemetry for SentryTelemetry {
    fn request_hook(&self) -> anyhow::Result<Middleware> {
        Ok(Middleware::new(|router| {
            router.layer(NewSentryLayer::<Request>::new_from_top())
        }))
    }

    fn tracing_hook(&self) -> anyhow::Result<Middleware> {
        Ok(Middleware::new(|router| {
            router
                .layer(SentryHttpLayer::with_transaction())
                .layer(TraceLayer::new_for_http())
        }))
    }

    fn error_handler(&self) -> anyhow::Result<Middleware> {
        Ok(Middleware::new(|router| {
            router
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(middleware::from_fn(report_server_errors))
        }))
    }
}

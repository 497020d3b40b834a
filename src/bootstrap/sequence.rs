//! The ordered capability sequence.
//!
//! Order matters:
//! - the telemetry request and tracing hooks come first so they observe every request,
//! - body limits and CORS run before anything that inspects the request,
//! - static assets are registered before the catch-all fallback,
//! - the telemetry error handler comes last; the builder still places it
//!   just inside the telemetry hooks, so it wraps every other middleware.

use axum::routing::get;

use super::{guard, BootstrapError, Capability, Outcome, ServerBuilder};
use crate::config::Settings;
use crate::domain::ports::{Integrations, Middleware};
use crate::presentation::http::handlers::{assets, debug};
use crate::presentation::http::routes::{CHAT_PREFIX, DEBUG_SENTRY_PATH};
use crate::presentation::middleware::{body, cors};

/// Names of the registered and skipped capabilities, in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub registered: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Build the startup capabilities in registration order.
pub fn capabilities(settings: &Settings, integrations: &Integrations) -> Vec<Capability> {
    let request_telemetry = integrations.telemetry.clone();
    let tracing_telemetry = integrations.telemetry.clone();
    let error_telemetry = integrations.telemetry.clone();
    let auth = integrations.auth.clone();
    let chat = integrations.chat.clone();
    let body_limit = settings.server.body_limit;
    let client_url = settings.client_url.clone();
    let static_assets = settings.assets.clone();
    let fallback_assets = settings.assets.clone();

    vec![
        Capability::recoverable("sentry-request-hook", move |builder| {
            builder.use_telemetry("sentry request hub", request_telemetry.request_hook()?)
        }),
        Capability::recoverable("sentry-tracing-hook", move |builder| {
            builder.use_telemetry("sentry tracing", tracing_telemetry.tracing_hook()?)
        }),
        Capability::recoverable("json-body-parser", move |builder| {
            builder.use_middleware("json body limit", body::json_body_limit(body_limit))
        }),
        Capability::recoverable("cors", move |builder| {
            let layer = cors::create_cors_layer(&client_url)?;
            builder.use_middleware(
                "cors",
                Middleware::new(move |router| router.layer(layer.clone())),
            )
        }),
        Capability::recoverable("auth-middleware", move |builder| {
            builder.use_middleware("session auth", auth.middleware()?)
        }),
        Capability::recoverable("debug-sentry-route", |builder| {
            builder.route(DEBUG_SENTRY_PATH, get(debug::debug_sentry))
        }),
        Capability::recoverable("chat-routes", move |builder| {
            builder.nest(CHAT_PREFIX, chat.routes()?)
        }),
        Capability::recoverable("static-assets", move |builder| {
            let root = assets::resolve_static_dir(&static_assets)?;
            if !root.is_dir() {
                tracing::warn!(root = %root.display(), "Static asset directory does not exist");
            }
            builder.serve_static(root)
        }),
        Capability::recoverable("spa-fallback", move |builder| {
            let root = assets::resolve_static_dir(&fallback_assets)?;
            builder.fallback("index.html", assets::spa_fallback(root.join(assets::INDEX_DOCUMENT)))
        }),
        Capability::recoverable("sentry-error-handler", move |builder| {
            let handler = error_telemetry.error_handler()?;
            builder.use_error_handler("sentry error handler", handler)
        }),
    ]
}

/// Register every capability in order.
///
/// Recoverable failures are recorded in the report; the remaining
/// capabilities are still attempted.
///
/// # Errors
///
/// Stops at the first fatal capability that fails.
pub fn register_all(
    builder: &mut ServerBuilder,
    capabilities: Vec<Capability>,
) -> Result<RegistrationReport, BootstrapError> {
    let mut report = RegistrationReport::default();

    for capability in capabilities {
        let name = capability.name();
        match guard::register(builder, capability)? {
            Outcome::Registered => report.registered.push(name),
            Outcome::Skipped => report.skipped.push(name),
        }
    }

    tracing::info!(
        registered = report.registered.len(),
        skipped = report.skipped.len(),
        "Capability sequence complete"
    );

    Ok(report)
}

//! Telemetry and Observability
//!
//! Structured logging and Sentry client setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::SentrySettings;

/// Initialize tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chat_backend=debug,sqlx=warn,tower_http=debug")
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });
    let json_layer = json.then(|| fmt::layer().json().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::info!("Tracing initialized");
}

/// Initialize the Sentry client. Keep the returned guard alive for the life
/// of the process; dropping it flushes pending events.
///
/// Returns `None` when no DSN is configured or the DSN is invalid; the
/// request and error hooks then run without sending anything.
pub fn init_sentry(
    settings: &SentrySettings,
    environment: &str,
) -> Option<sentry::ClientInitGuard> {
    if settings.dsn.is_empty() {
        tracing::warn!("SENTRY_DSN not set, error telemetry disabled");
        return None;
    }

    let dsn = match settings.dsn.parse::<sentry::types::Dsn>() {
        Ok(dsn) => dsn,
        Err(error) => {
            tracing::error!(error = %error, "Invalid SENTRY_DSN, error telemetry disabled");
            return None;
        }
    };

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        environment: Some(environment.to_owned().into()),
        traces_sample_rate: settings.traces_sample_rate,
        send_default_pii: true,
        ..Default::default()
    });

    tracing::info!(environment, "Sentry initialized");
    Some(guard)
}

//! Preflight check.
//!
//! Probes each integration in startup order and stops at the first failure,
//! so a broken deployment can be diagnosed without starting the server.
//! Exits 0 when every probe passes, 1 otherwise.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use chat_backend::config::Settings;
use chat_backend::domain::Integrations;
use chat_backend::infrastructure;
use chat_backend::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(probe = "configuration", error = %e, "FAILED");
            return ExitCode::FAILURE;
        }
    };
    info!(probe = "configuration", "OK");

    let integrations = infrastructure::integrations(&settings);
    match run_probes(&integrations).await {
        Ok(()) => {
            info!("All probes passed");
            ExitCode::SUCCESS
        }
        Err((probe, e)) => {
            error!(probe, error = %e, details = ?e, "FAILED");
            ExitCode::FAILURE
        }
    }
}

async fn run_probes(integrations: &Integrations) -> Result<(), (&'static str, anyhow::Error)> {
    probe("sentry-request-hook", || integrations.telemetry.request_hook().map(drop))?;
    probe("sentry-tracing-hook", || integrations.telemetry.tracing_hook().map(drop))?;
    probe("sentry-error-handler", || integrations.telemetry.error_handler().map(drop))?;
    probe("auth-middleware", || integrations.auth.middleware().map(drop))?;
    probe("chat-routes", || integrations.chat.routes().map(drop))?;

    info!(probe = "data-store", "probing");
    integrations
        .store
        .connect()
        .await
        .map_err(|e| ("data-store", e))?;
    info!(probe = "data-store", "OK");

    info!(probe = "jobs", "probing");
    let config = integrations.jobs.resolve().await.map_err(|e| ("jobs", e))?;
    let (client, functions) = config
        .into_parts()
        .context("job client or functions missing")
        .map_err(|e| ("jobs", e))?;
    let adapter = integrations.jobs.serve_adapter().map_err(|e| ("jobs", e))?;
    adapter
        .serve(client, functions)
        .map_err(|e| ("jobs", e))?;
    info!(probe = "jobs", "OK");

    Ok(())
}

fn probe<F>(name: &'static str, check: F) -> Result<(), (&'static str, anyhow::Error)>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    info!(probe = name, "probing");
    check().map_err(|e| (name, e))?;
    info!(probe = name, "OK");
    Ok(())
}

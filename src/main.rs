//! # Chat Backend
//!
//! Application entry point:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Sentry client
//! - Fault-tolerant server startup

use std::process::ExitCode;

use tracing::{error, info};

use chat_backend::config::Settings;
use chat_backend::infrastructure;
use chat_backend::startup::Application;
use chat_backend::telemetry;

fn main() -> ExitCode {
    // Initialize tracing subscriber for structured logging
    telemetry::init_tracing();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // The Sentry client must exist before the runtime starts its threads.
    let _sentry = telemetry::init_sentry(&settings.sentry, &settings.environment);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server terminated");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(settings: Settings) -> Result<(), chat_backend::bootstrap::BootstrapError> {
    let integrations = infrastructure::integrations(&settings);
    let application = Application::build(settings, integrations).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await
}

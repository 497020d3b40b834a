//! Infrastructure Layer
//!
//! Default implementations of the integration ports:
//! - PostgreSQL data store and repositories
//! - Sentry error telemetry hooks
//! - Background job module and serve adapter

pub mod database;
pub mod jobs;
pub mod repositories;
pub mod sentry_hooks;

use std::sync::Arc;

use crate::config::Settings;
use crate::domain::ports::Integrations;
use crate::presentation::http::routes::ChatRoutes;
use crate::presentation::middleware::SessionAuth;

use self::database::PostgresStore;
use self::jobs::InngestModule;
use self::sentry_hooks::SentryTelemetry;

/// Wire the default integrations from settings.
pub fn integrations(settings: &Settings) -> Integrations {
    let store = Arc::new(PostgresStore::new(settings.database.clone()));

    Integrations {
        telemetry: Arc::new(SentryTelemetry),
        auth: Arc::new(SessionAuth::new(settings.auth.secret_key.clone())),
        chat: Arc::new(ChatRoutes::new(settings.chat.clone())),
        store: store.clone(),
        jobs: Arc::new(InngestModule::new(settings.jobs.clone(), store)),
    }
}

//! Background Jobs
//!
//! Inngest-style integration: a client identified by app id and event key,
//! the functions it serves, and the HTTP adapter the platform calls.

pub mod functions;
pub mod serve;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::JobsSettings;
use crate::domain::jobs::{JobClient, JobsConfig};
use crate::domain::ports::{JobsModule, ServeAdapter};
use crate::domain::user::UserRepository;
use crate::infrastructure::database::PostgresStore;
use crate::infrastructure::repositories::PgUserRepository;

pub use serve::InngestServe;

/// Default [`JobsModule`].
#[derive(Debug, Clone)]
pub struct InngestModule {
    settings: JobsSettings,
    store: Arc<PostgresStore>,
}

impl InngestModule {
    pub fn new(settings: JobsSettings, store: Arc<PostgresStore>) -> Self {
        Self { settings, store }
    }
}

#[async_trait]
impl JobsModule for InngestModule {
    async fn resolve(&self) -> anyhow::Result<JobsConfig> {
        if self.settings.app_id.trim().is_empty() {
            anyhow::bail!("jobs.app_id must not be empty");
        }

        let client = if self.settings.event_key.is_empty() {
            tracing::debug!("INNGEST_EVENT_KEY not set, job client unavailable");
            None
        } else {
            Some(JobClient {
                app_id: self.settings.app_id.clone(),
                event_key: self.settings.event_key.clone(),
            })
        };

        let store = self.store.clone();
        let users = move || {
            store
                .pool()
                .map(|pool| Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>)
        };

        Ok(JobsConfig {
            client,
            functions: Some(functions::user_sync_functions(users)),
        })
    }

    fn serve_adapter(&self) -> anyhow::Result<Arc<dyn ServeAdapter>> {
        Ok(Arc::new(InngestServe::new(self.settings.signing_key.clone())))
    }
}

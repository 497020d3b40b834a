//! Database Module
//!
//! PostgreSQL connection pool and the startup connectivity check.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseSettings;
use crate::domain::ports::DataStore;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Create tables the server writes to, if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            external_id TEXT PRIMARY KEY,
            email       TEXT NOT NULL,
            name        TEXT NOT NULL,
            image       TEXT,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Default [`DataStore`]: a PostgreSQL pool created on `connect`.
#[derive(Debug)]
pub struct PostgresStore {
    settings: DatabaseSettings,
    pool: RwLock<Option<PgPool>>,
}

impl PostgresStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            pool: RwLock::new(None),
        }
    }

    /// The pool, once connected.
    pub fn pool(&self) -> Option<PgPool> {
        self.pool.read().clone()
    }
}

#[async_trait]
impl DataStore for PostgresStore {
    async fn connect(&self) -> anyhow::Result<()> {
        let pool = create_pool(&self.settings)
            .await
            .context("failed to connect to PostgreSQL")?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("PostgreSQL did not answer the connectivity check")?;
        ensure_schema(&pool).await.context("failed to prepare schema")?;

        tracing::info!(
            max_connections = self.settings.max_connections,
            "Database connection pool created"
        );
        *self.pool.write() = Some(pool);
        Ok(())
    }
}

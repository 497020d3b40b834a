//! User Repository Implementation
//!
//! PostgreSQL storage for users mirrored from the identity provider.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::{UserProfile, UserRepository};
use crate::shared::error::AppError;

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn upsert(&self, user: &UserProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (external_id, email, name, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (external_id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                image = EXCLUDED.image,
                updated_at = NOW()
            "#,
        )
        .bind(&user.external_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, external_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE external_id = $1")
            .bind(external_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

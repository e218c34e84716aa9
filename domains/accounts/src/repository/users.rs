//! User repository

use soudan_common::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use super::{UserStore, EMAIL_TAKEN};
use crate::domain::entities::{ProfileUpdate, User};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, email, password_hash, username, gemini_api_key,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, password_hash, username, gemini_api_key,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.username)
        .bind(&user.gemini_api_key)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Validation(EMAIL_TAKEN.to_string())
            }
            other => Error::Database(other),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, username, gemini_api_key,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, username, gemini_api_key,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                username = CASE WHEN $2 THEN $3 ELSE username END,
                gemini_api_key = CASE WHEN $4 THEN $5 ELSE gemini_api_key END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, username, gemini_api_key,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.username.is_some())
        .bind(update.username.clone().flatten())
        .bind(update.gemini_api_key.is_some())
        .bind(update.gemini_api_key.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

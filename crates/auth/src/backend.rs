//! Concrete authentication backend
//!
//! Wraps an identity read model + `AuthConfig`. The PostgreSQL read model
//! uses runtime `sqlx::query_as` against the accounts domain's `users` table.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::types::AuthIdentity;

/// Read access to caller identities.
///
/// The accounts domain owns the `users` table; this is the narrow view the
/// auth layer needs to resolve a verified token into a caller.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError>;
}

/// PostgreSQL identity read model
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_identity(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        sqlx::query_as::<_, AuthIdentity>(
            r#"
            SELECT id, email, username, gemini_api_key, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })
    }
}

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    identities: Arc<dyn IdentityStore>,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(identities: Arc<dyn IdentityStore>, config: AuthConfig) -> Self {
        Self { identities, config }
    }

    /// Backend reading identities from PostgreSQL
    pub fn postgres(pool: PgPool, config: AuthConfig) -> Self {
        Self::new(Arc::new(PgIdentityStore::new(pool)), config)
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Issue a bearer token for a user
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        crate::jwt::issue_token(user_id, &self.config, Utc::now())
    }

    /// Verify a bearer token and return the user ID it was issued for
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)
    }

    /// Hash a password with the configured work factor
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        crate::password::hash_password(password, self.config.bcrypt_cost).await
    }

    /// Verify a password against a stored hash
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        crate::password::verify_password(password, hash).await
    }

    /// Resolve a bearer token into the caller's identity.
    ///
    /// The user must still exist; tokens for deleted users are rejected.
    pub async fn authenticate_jwt(&self, token: &str) -> Result<AuthIdentity, AuthError> {
        let user_id = self.verify_token(token)?;

        self.identities
            .find_identity(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

//! Auth read-model types
//!
//! Lightweight view of the `users` row owned by the accounts domain.
//! Carries only what authentication and the conversation flow need.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity of an authenticated caller
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub gemini_api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuthIdentity {
    /// Personal provider key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for AuthIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthIdentity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("created_at", &self.created_at)
            .finish()
    }
}

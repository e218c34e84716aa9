//! Domain entities for Accounts domain

use chrono::{DateTime, Utc};
use soudan_auth::AuthIdentity;
use soudan_common::Result;
use uuid::Uuid;

use super::validation::{normalize_api_key, normalize_email, normalize_username};

/// User entity
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub gemini_api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Identity view used by the auth layer
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("username", &self.username)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Registration input after the password has been hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl NewUser {
    /// Validate and normalize registration fields
    pub fn new(
        email: &str,
        username: Option<String>,
        gemini_api_key: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            email: normalize_email(email)?,
            username: normalize_username(username)?,
            gemini_api_key: normalize_api_key(gemini_api_key),
        })
    }

    pub fn into_user(self, password_hash: String) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash,
            username: self.username,
            gemini_api_key: self.gemini_api_key,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile changes. The outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub username: Option<Option<String>>,
    pub gemini_api_key: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn new(
        username: Option<Option<String>>,
        gemini_api_key: Option<Option<String>>,
    ) -> Result<Self> {
        Ok(Self {
            username: username.map(normalize_username).transpose()?,
            gemini_api_key: gemini_api_key.map(normalize_api_key),
        })
    }

    /// Apply the changes to a loaded user
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(key) = &self.gemini_api_key {
            user.gemini_api_key = key.clone();
        }
        user.updated_at = Utc::now();
    }
}

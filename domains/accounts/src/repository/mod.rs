//! Repository implementations for Accounts domain

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod users;

use soudan_common::Result;
use uuid::Uuid;

use crate::domain::entities::{ProfileUpdate, User};

pub use users::PgUserStore;

/// User persistence
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email is `Error::Validation("Email already exists")`.
    async fn create(&self, user: &User) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Look up by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<User>>;

    /// Replace the password hash. Returns whether the user existed.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool>;
}

pub(crate) const EMAIL_TAKEN: &str = "Email already exists";

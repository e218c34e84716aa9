//! In-memory user store for tests
//!
//! Also serves as the auth layer's identity read model so router tests can
//! run without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use soudan_auth::{AuthError, AuthIdentity, IdentityStore};
use soudan_common::{Error, Result};
use uuid::Uuid;

use super::{UserStore, EMAIL_TAKEN};
use crate::domain::entities::{ProfileUpdate, User};

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .lock()
            .map_err(|_| Error::Internal("in-memory store poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUsers {
    async fn create(&self, user: &User) -> Result<User> {
        let mut users = self.lock()?;
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::Validation(EMAIL_TAKEN.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock()?.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<User>> {
        let mut users = self.lock()?;
        Ok(users.get_mut(&id).map(|user| {
            update.apply(user);
            user.clone()
        }))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let mut users = self.lock()?;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryUsers {
    async fn find_identity(&self, id: Uuid) -> std::result::Result<Option<AuthIdentity>, AuthError> {
        let users = self.users.lock().map_err(|_| AuthError::UserLoadError)?;
        Ok(users.get(&id).map(User::identity))
    }
}

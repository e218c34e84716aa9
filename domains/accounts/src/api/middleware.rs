//! Accounts domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use soudan_auth::AuthBackend;

use crate::repository::UserStore;

/// Application state for the Accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub users: Arc<dyn UserStore>,
    pub auth: AuthBackend,
}

impl FromRef<AccountsState> for AuthBackend {
    fn from_ref(state: &AccountsState) -> Self {
        state.auth.clone()
    }
}

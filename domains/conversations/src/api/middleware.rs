//! Conversations domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use soudan_auth::AuthBackend;

use crate::domain::orchestrator::ConversationOrchestrator;
use crate::ConversationsRepositories;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub repos: ConversationsRepositories,
    pub auth: AuthBackend,
    pub orchestrator: Arc<ConversationOrchestrator>,
}

impl FromRef<ConversationsState> for AuthBackend {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}

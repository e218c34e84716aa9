//! Repository implementations for Conversations domain

pub mod conversations;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod messages;

use std::sync::Arc;

use sqlx::PgPool;
use soudan_common::Result;
use uuid::Uuid;

use crate::domain::entities::{Conversation, ConversationSummary, Message, NewMessage};

pub use conversations::PgConversationStore;
pub use messages::PgMessageStore;

/// Conversation persistence
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation>;

    /// Find a conversation owned by `user_id`. Other users' conversations are `None`.
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Conversation>>;

    /// Conversations of a user with message counts, newest first
    async fn list_summaries(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>>;

    /// Write `title` only if the conversation has none. Returns whether it was written.
    async fn set_title_if_unset(&self, id: Uuid, title: &str) -> Result<bool>;
}

/// Append-only message persistence
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message, assigning the next sequence and a strictly later timestamp
    async fn append(&self, message: NewMessage) -> Result<Message>;

    /// Full history of a conversation, ordered by sequence
    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>>;
}

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pub conversations: Arc<dyn ConversationStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl ConversationsRepositories {
    pub fn new(conversations: Arc<dyn ConversationStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            conversations,
            messages,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgConversationStore::new(pool.clone())),
            Arc::new(PgMessageStore::new(pool)),
        )
    }
}

//! In-memory stores for tests
//!
//! One shared store implements both [`ConversationStore`] and [`MessageStore`]
//! so list summaries can count messages. Failures can be injected per
//! operation to exercise partial-commit paths.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use soudan_common::{Error, Result};
use uuid::Uuid;

use super::{ConversationStore, ConversationsRepositories, MessageStore};
use crate::domain::entities::{Conversation, ConversationSummary, Message, MessageRole, NewMessage};

#[derive(Default)]
struct Inner {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    fail_append_role: Option<MessageRole>,
    fail_history: bool,
    fail_title: bool,
}

/// Shared in-memory conversation and message store
#[derive(Clone, Default)]
pub struct InMemoryConversations {
    inner: Arc<Mutex<Inner>>,
}

fn injected(operation: &str) -> Error {
    Error::Internal(format!("injected {} failure", operation))
}

impl InMemoryConversations {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("in-memory store poisoned".to_string()))
    }

    /// Repositories backed by this store
    pub fn repositories(&self) -> ConversationsRepositories {
        ConversationsRepositories::new(Arc::new(self.clone()), Arc::new(self.clone()))
    }

    /// Make every append of `role` fail
    pub fn fail_appends_of(&self, role: MessageRole) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_append_role = Some(role);
        }
    }

    pub fn fail_history_loads(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_history = true;
        }
    }

    pub fn fail_title_updates(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_title = true;
        }
    }

    /// Every stored message, in insertion order
    pub fn all_messages(&self) -> Vec<Message> {
        self.inner
            .lock()
            .map(|inner| inner.messages.clone())
            .unwrap_or_default()
    }

    pub fn conversation(&self, id: Uuid) -> Option<Conversation> {
        self.inner
            .lock()
            .ok()?
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversations {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        let mut inner = self.lock()?;
        inner.conversations.push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Conversation>> {
        Ok(self
            .lock()?
            .conversations
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn list_summaries(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let inner = self.lock()?;
        let mut summaries: Vec<ConversationSummary> = inner
            .conversations
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .map(|c| ConversationSummary {
                id: c.id,
                specialist_type: c.specialist_type,
                title: c.title.clone(),
                created_at: c.created_at,
                message_count: inner
                    .messages
                    .iter()
                    .filter(|m| m.conversation_id == c.id)
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn set_title_if_unset(&self, id: Uuid, title: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.fail_title {
            return Err(injected("title update"));
        }
        match inner.conversations.iter_mut().find(|c| c.id == id) {
            Some(conv) if conv.title.is_none() => {
                conv.title = Some(title.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryConversations {
    async fn append(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.lock()?;
        if inner.fail_append_role == Some(message.role) {
            return Err(injected("append"));
        }
        if !inner
            .conversations
            .iter()
            .any(|c| c.id == message.conversation_id)
        {
            return Err(Error::Internal(
                "messages.conversation_id references a missing conversation".to_string(),
            ));
        }

        let previous = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == message.conversation_id)
            .max_by_key(|m| m.sequence);

        let now = Utc::now();
        let (sequence, created_at) = match previous {
            Some(prev) => (
                prev.sequence + 1,
                now.max(prev.created_at + Duration::microseconds(1)),
            ),
            None => (1, now),
        };

        let stored = Message {
            id: message.id,
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            sequence,
            created_at,
        };
        inner.messages.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let inner = self.lock()?;
        if inner.fail_history {
            return Err(injected("history load"));
        }
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.sequence);
        Ok(messages)
    }
}

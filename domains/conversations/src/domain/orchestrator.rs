//! Conversation turn orchestration
//!
//! One turn: persist the user message, load history, generate a reply,
//! persist it, then derive a title on the first exchange. A failure after the
//! user message is stored leaves that message committed.

use std::sync::Arc;

use soudan_auth::AuthIdentity;
use soudan_common::Error;
use uuid::Uuid;

use super::entities::{Message, MessageRole, NewMessage};
use super::generator::{ReplyGenerator, ReplySource};
use super::title::derive_title;
use crate::repository::{ConversationStore, MessageStore};

/// Why a turn could not complete
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// Missing or owned by another user; the two are indistinguishable
    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("Message content cannot be empty")]
    InvalidContent,

    #[error("Failed to persist turn: {0}")]
    Persistence(#[source] Error),
}

impl From<TurnError> for Error {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::ConversationNotFound => Error::NotFound(err.to_string()),
            TurnError::InvalidContent => Error::Validation(err.to_string()),
            TurnError::Persistence(source) => Error::Internal(source.to_string()),
        }
    }
}

/// A completed turn
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Conversation title after the turn
    pub title: Option<String>,
    pub reply_source: ReplySource,
}

impl Turn {
    pub fn into_pair(self) -> [Message; 2] {
        [self.user_message, self.assistant_message]
    }
}

/// Runs conversation turns
#[derive(Clone)]
pub struct ConversationOrchestrator {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    generator: ReplyGenerator,
    default_api_key: Option<String>,
}

impl ConversationOrchestrator {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        generator: ReplyGenerator,
    ) -> Self {
        Self {
            conversations,
            messages,
            generator,
            default_api_key: None,
        }
    }

    /// Server-wide provider key used for users without a personal key
    pub fn with_default_api_key(mut self, key: Option<String>) -> Self {
        self.default_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Submit a user message and produce the assistant reply
    pub async fn submit_message(
        &self,
        user: &AuthIdentity,
        conversation_id: Uuid,
        content: &str,
    ) -> Result<Turn, TurnError> {
        let conversation = self
            .conversations
            .find_for_user(conversation_id, user.id)
            .await
            .map_err(TurnError::Persistence)?
            .ok_or(TurnError::ConversationNotFound)?;

        let new_message =
            NewMessage::user(conversation.id, content).map_err(|_| TurnError::InvalidContent)?;

        let user_message = self
            .messages
            .append(new_message)
            .await
            .map_err(TurnError::Persistence)?;

        let history = self
            .messages
            .list_by_conversation(conversation.id)
            .await
            .map_err(|e| {
                tracing::error!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "Failed to load history; user message kept without reply"
                );
                TurnError::Persistence(e)
            })?;

        let api_key = user.api_key().or(self.default_api_key.as_deref());
        let reply = self
            .generator
            .generate_reply(conversation.specialist_type, &history, api_key)
            .await;
        let reply_source = reply.source();

        let assistant_message = NewMessage::assistant(conversation.id, reply.into_text())
            .map_err(TurnError::Persistence)?;
        let assistant_message = self
            .messages
            .append(assistant_message)
            .await
            .map_err(|e| {
                tracing::error!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "Failed to store reply; user message kept without reply"
                );
                TurnError::Persistence(e)
            })?;

        let mut title = conversation.title.clone();
        let user_turns = history
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();

        if title.is_none() && user_turns == 1 {
            let derived = derive_title(content);
            match self
                .conversations
                .set_title_if_unset(conversation.id, &derived)
                .await
            {
                Ok(true) => title = Some(derived),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        conversation_id = %conversation.id,
                        error = %e,
                        "Failed to set conversation title"
                    );
                }
            }
        }

        tracing::info!(
            conversation_id = %conversation.id,
            user_id = %user.id,
            reply_source = ?reply_source,
            "Conversation turn completed"
        );

        Ok(Turn {
            user_message,
            assistant_message,
            title,
            reply_source,
        })
    }
}

//! Domain entities for Conversations domain
//!
//! Conversations belong to one user and carry a specialist persona. Messages
//! are append-only and ordered by a per-conversation `sequence`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use soudan_common::{Error, Result};

use super::specialists::SpecialistType;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(Error::Validation(format!("Invalid message role: {}", other))),
        }
    }
}

/// Maximum title length (varchar(200))
pub const MAX_TITLE_LENGTH: usize = 200;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub specialist_type: SpecialistType,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation. A blank title is treated as unset.
    pub fn new(
        user_id: Uuid,
        specialist_type: SpecialistType,
        title: Option<String>,
    ) -> Result<Self> {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(ref t) = title {
            if t.chars().count() > MAX_TITLE_LENGTH {
                return Err(Error::Validation(format!(
                    "Title must be at most {} characters",
                    MAX_TITLE_LENGTH
                )));
            }
        }

        Ok(Conversation {
            id: Uuid::new_v4(),
            user_id,
            specialist_type,
            title,
            created_at: Utc::now(),
        })
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Conversation list entry
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub specialist_type: SpecialistType,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub message_count: i64,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Position within the conversation; internal ordering only
    #[serde(skip)]
    pub sequence: i32,
    pub created_at: DateTime<Utc>,
}

/// A message ready to be appended; the store assigns `sequence` and `created_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
}

impl NewMessage {
    pub fn new(conversation_id: Uuid, role: MessageRole, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }

        Ok(NewMessage {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content,
        })
    }

    /// User message with surrounding whitespace removed
    pub fn user(conversation_id: Uuid, content: &str) -> Result<Self> {
        Self::new(conversation_id, MessageRole::User, content.trim())
    }

    pub fn assistant(conversation_id: Uuid, content: impl Into<String>) -> Result<Self> {
        Self::new(conversation_id, MessageRole::Assistant, content)
    }
}

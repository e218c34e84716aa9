//! Conversation management API handlers
//!
//! - GET /conversations - List the caller's conversations, newest first
//! - POST /conversations - Start a conversation with a specialist
//! - GET /conversations/{id} - Get a conversation with its messages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soudan_auth::AuthUser;
use soudan_common::{Error, Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use super::messages::MessageResponse;
use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Conversation, ConversationSummary};
use crate::domain::specialists::SpecialistType;

/// Title shown in listings for conversations that have none yet
pub const UNTITLED_CONVERSATION: &str = "新しい会話";

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(min = 1, message = "Specialist type is required"))]
    pub specialist_type: String,

    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
}

/// Conversation response DTO
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialist_type: SpecialistType,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl ConversationResponse {
    fn with_messages(c: Conversation, messages: Vec<MessageResponse>) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            specialist_type: c.specialist_type,
            title: c.title,
            created_at: c.created_at,
            messages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationEnvelope {
    pub conversation: ConversationResponse,
}

/// Conversation list entry DTO
#[derive(Debug, Serialize)]
pub struct ConversationSummaryResponse {
    pub id: Uuid,
    pub specialist_type: SpecialistType,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub message_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(s: ConversationSummary) -> Self {
        Self {
            id: s.id,
            specialist_type: s.specialist_type,
            title: s
                .title
                .unwrap_or_else(|| UNTITLED_CONVERSATION.to_string()),
            created_at: s.created_at,
            message_count: s.message_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummaryResponse>,
}

/// Create a new conversation
pub async fn create_conversation(
    AuthUser(user): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationEnvelope>)> {
    let specialist_type = SpecialistType::resolve(&req.specialist_type)?;
    let conversation = Conversation::new(user.id, specialist_type, req.title)?;

    let created = state.repos.conversations.create(&conversation).await?;

    tracing::info!(
        conversation_id = %created.id,
        user_id = %user.id,
        specialist = %created.specialist_type,
        "Conversation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ConversationEnvelope {
            conversation: ConversationResponse::with_messages(created, Vec::new()),
        }),
    ))
}

/// List conversations for the authenticated user
pub async fn list_conversations(
    AuthUser(user): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<ConversationListResponse>> {
    let summaries = state.repos.conversations.list_summaries(user.id).await?;

    Ok(Json(ConversationListResponse {
        conversations: summaries.into_iter().map(Into::into).collect(),
    }))
}

/// Get a single conversation by ID
pub async fn get_conversation(
    AuthUser(user): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationEnvelope>> {
    let conversation = state
        .repos
        .conversations
        .find_for_user(id, user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    let messages = state.repos.messages.list_by_conversation(id).await?;

    Ok(Json(ConversationEnvelope {
        conversation: ConversationResponse::with_messages(
            conversation,
            messages.into_iter().map(Into::into).collect(),
        ),
    }))
}

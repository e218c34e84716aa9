//! Message API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soudan_auth::AuthUser;
use soudan_common::{Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageRole};

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// Response for send message: the user message followed by the reply
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub messages: [MessageResponse; 2],
}

/// Send a message to a conversation and get the specialist's reply
pub async fn send_message(
    AuthUser(user): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    let turn = state
        .orchestrator
        .submit_message(&user, conversation_id, &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            messages: turn.into_pair().map(Into::into),
        }),
    ))
}

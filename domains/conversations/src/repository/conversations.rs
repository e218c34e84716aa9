//! Conversation repository

use sqlx::PgPool;
use soudan_common::Result;
use uuid::Uuid;

use super::ConversationStore;
use crate::domain::entities::{Conversation, ConversationSummary};

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConversationStore for PgConversationStore {
    async fn create(&self, conv: &Conversation) -> Result<Conversation> {
        let created = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, user_id, specialist_type, title, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, specialist_type, title, created_at
            "#,
        )
        .bind(conv.id)
        .bind(conv.user_id)
        .bind(conv.specialist_type.as_str())
        .bind(&conv.title)
        .bind(conv.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Conversation>> {
        let conv = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, user_id, specialist_type, title, created_at
            FROM conversations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conv)
    }

    async fn list_summaries(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let summaries = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT c.id, c.specialist_type, c.title, c.created_at,
                   COUNT(m.id) AS message_count
            FROM conversations c
            LEFT JOIN messages m ON m.conversation_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn set_title_if_unset(&self, id: Uuid, title: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET title = $2
            WHERE id = $1 AND title IS NULL
            "#,
        )
        .bind(id)
        .bind(title)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Message repository

use sqlx::PgPool;
use soudan_common::Result;
use uuid::Uuid;

use super::MessageStore;
use crate::domain::entities::{Message, NewMessage};

#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, msg: NewMessage) -> Result<Message> {
        // Sequence and timestamp come from the same aggregate so both orders agree.
        // A concurrent append losing the race trips the (conversation_id, sequence) key.
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, sequence, created_at)
            SELECT $1, $2, $3, $4,
                   COALESCE(MAX(m.sequence), 0) + 1,
                   GREATEST(clock_timestamp(), MAX(m.created_at) + INTERVAL '1 microsecond')
            FROM messages m
            WHERE m.conversation_id = $2
            RETURNING id, conversation_id, role, content, sequence, created_at
            "#,
        )
        .bind(msg.id)
        .bind(msg.conversation_id)
        .bind(msg.role)
        .bind(&msg.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, role, content, sequence, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}

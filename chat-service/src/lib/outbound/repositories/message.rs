use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use super::conversation::corrupt_row;
use super::conversation::database_error;
use crate::domain::conversation::errors::ConversationError;
use crate::domain::conversation::models::ConversationId;
use crate::domain::conversation::models::Message;
use crate::domain::conversation::models::MessageContent;
use crate::domain::conversation::models::MessageId;
use crate::domain::conversation::models::Role;
use crate::domain::conversation::ports::MessageRepository;
use crate::domain::user::models::UserId;

/// Messages are reached through their conversation: owner filters join on
/// `conversations.owner_id`.
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: PgRow) -> Result<Message, ConversationError> {
        let role: String = row.try_get("role").map_err(database_error)?;

        Ok(Message {
            id: MessageId(row.try_get("id").map_err(database_error)?),
            conversation_id: ConversationId(row.try_get("conversation_id").map_err(database_error)?),
            role: role.parse::<Role>().map_err(corrupt_row)?,
            content: MessageContent::new(row.try_get("content").map_err(database_error)?)
                .map_err(corrupt_row)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, ConversationError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.0)
        .bind(message.conversation_id.0)
        .bind(message.role.as_str())
        .bind(message.content.as_str())
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(message)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ConversationError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, role, content, created_at, updated_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Self::row_to_message).collect()
    }

    async fn find_by_id(
        &self,
        id: MessageId,
        owner: UserId,
    ) -> Result<Option<Message>, ConversationError> {
        let row = sqlx::query(
            r#"
            SELECT m.id, m.conversation_id, m.role, m.content, m.created_at, m.updated_at
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE m.id = $1 AND c.owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_message).transpose()
    }

    async fn update_content(
        &self,
        id: MessageId,
        owner: UserId,
        content: MessageContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Message>, ConversationError> {
        let row = sqlx::query(
            r#"
            UPDATE messages m
            SET content = $3, updated_at = $4
            FROM conversations c
            WHERE m.id = $1 AND c.id = m.conversation_id AND c.owner_id = $2
            RETURNING m.id, m.conversation_id, m.role, m.content, m.created_at, m.updated_at
            "#,
        )
        .bind(id.0)
        .bind(owner.as_i64())
        .bind(content.as_str())
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_message).transpose()
    }

    async fn delete(&self, id: MessageId, owner: UserId) -> Result<bool, ConversationError> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages m
            USING conversations c
            WHERE m.id = $1 AND c.id = m.conversation_id AND c.owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.as_i64())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}

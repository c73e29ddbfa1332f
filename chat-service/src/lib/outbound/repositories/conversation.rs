use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::conversation::errors::ConversationError;
use crate::domain::conversation::models::Conversation;
use crate::domain::conversation::models::ConversationId;
use crate::domain::conversation::models::ConversationTitle;
use crate::domain::conversation::ports::ConversationRepository;
use crate::domain::user::models::UserId;

pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_conversation(row: PgRow) -> Result<Conversation, ConversationError> {
        Ok(Conversation {
            id: ConversationId(row.try_get("id").map_err(database_error)?),
            owner_id: UserId(row.try_get("owner_id").map_err(database_error)?),
            title: ConversationTitle::new(row.try_get("title").map_err(database_error)?)
                .map_err(corrupt_row)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

pub(super) fn database_error(e: sqlx::Error) -> ConversationError {
    ConversationError::DatabaseError(e.to_string())
}

/// A stored value that no longer passes domain validation is a server-side
/// fault, not a client error.
pub(super) fn corrupt_row(e: impl std::fmt::Display) -> ConversationError {
    ConversationError::DatabaseError(format!("Corrupt row: {e}"))
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, ConversationError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, owner_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id.0)
        .bind(conversation.owner_id.as_i64())
        .bind(conversation.title.as_str())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(conversation)
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, ConversationError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_conversation).transpose()
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Conversation>, ConversationError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, title, created_at, updated_at
            FROM conversations
            WHERE owner_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Self::row_to_conversation).collect()
    }

    async fn update_title(
        &self,
        id: ConversationId,
        owner: UserId,
        title: ConversationTitle,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Conversation>, ConversationError> {
        let row = sqlx::query(
            r#"
            UPDATE conversations
            SET title = $3, updated_at = $4
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(owner.as_i64())
        .bind(title.as_str())
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_conversation).transpose()
    }

    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, ConversationError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1 AND owner_id = $2")
            .bind(id.0)
            .bind(owner.as_i64())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::ConversationError;
use super::models::AddMessageCommand;
use super::models::Conversation;
use super::models::ConversationDetails;
use super::models::ConversationId;
use super::models::ConversationTitle;
use super::models::CreateConversationCommand;
use super::models::Message;
use super::models::MessageContent;
use super::models::MessageId;
use crate::domain::user::models::UserId;

/// Port for conversation domain service operations.
///
/// Every operation is scoped to `owner`: records belonging to anyone else
/// are reported as not found.
#[async_trait]
pub trait ConversationServicePort: Send + Sync + 'static {
    /// Start a new conversation.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_conversation(
        &self,
        owner: UserId,
        command: CreateConversationCommand,
    ) -> Result<Conversation, ConversationError>;

    /// List the owner's conversations, most recently updated first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_conversations(&self, owner: UserId) -> Result<Vec<Conversation>, ConversationError>;

    /// Retrieve a conversation with all of its messages.
    ///
    /// # Errors
    /// * `NotFound` - Conversation does not exist or is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn get_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
    ) -> Result<ConversationDetails, ConversationError>;

    /// Change a conversation's title.
    ///
    /// # Errors
    /// * `NotFound` - Conversation does not exist or is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn rename_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
        title: ConversationTitle,
    ) -> Result<Conversation, ConversationError>;

    /// Delete a conversation and its messages.
    ///
    /// # Errors
    /// * `NotFound` - Conversation does not exist or is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn delete_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
    ) -> Result<(), ConversationError>;

    /// Append a message to a conversation.
    ///
    /// # Errors
    /// * `NotFound` - Conversation does not exist or is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn add_message(
        &self,
        owner: UserId,
        conversation_id: ConversationId,
        command: AddMessageCommand,
    ) -> Result<Message, ConversationError>;

    /// List a conversation's messages in chronological order.
    ///
    /// # Errors
    /// * `NotFound` - Conversation does not exist or is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn list_messages(
        &self,
        owner: UserId,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ConversationError>;

    /// Retrieve a single message.
    ///
    /// # Errors
    /// * `MessageNotFound` - Message does not exist or its conversation is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn get_message(&self, owner: UserId, id: MessageId) -> Result<Message, ConversationError>;

    /// Replace a message's content.
    ///
    /// # Errors
    /// * `MessageNotFound` - Message does not exist or its conversation is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn update_message(
        &self,
        owner: UserId,
        id: MessageId,
        content: MessageContent,
    ) -> Result<Message, ConversationError>;

    /// Delete a single message.
    ///
    /// # Errors
    /// * `MessageNotFound` - Message does not exist or its conversation is not owned by `owner`
    /// * `DatabaseError` - Database operation failed
    async fn delete_message(&self, owner: UserId, id: MessageId) -> Result<(), ConversationError>;
}

/// Repository port for conversation persistence operations.
///
/// Lookups, updates and deletes take the owner so rows of other users are
/// never matched.
#[async_trait]
pub trait ConversationRepository: Send + Sync + 'static {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, ConversationError>;

    async fn find_by_id(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, ConversationError>;

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Conversation>, ConversationError>;

    /// # Returns
    /// Updated conversation, or None if no owned row matched
    async fn update_title(
        &self,
        id: ConversationId,
        owner: UserId,
        title: ConversationTitle,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Conversation>, ConversationError>;

    /// # Returns
    /// True if an owned row was deleted
    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, ConversationError>;
}

/// Repository port for message persistence operations.
#[async_trait]
pub trait MessageRepository: Send + Sync + 'static {
    async fn create(&self, message: Message) -> Result<Message, ConversationError>;

    /// Messages of one conversation, oldest first. Ownership is checked by the caller.
    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ConversationError>;

    async fn find_by_id(
        &self,
        id: MessageId,
        owner: UserId,
    ) -> Result<Option<Message>, ConversationError>;

    /// # Returns
    /// Updated message, or None if no owned row matched
    async fn update_content(
        &self,
        id: MessageId,
        owner: UserId,
        content: MessageContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Message>, ConversationError>;

    /// # Returns
    /// True if an owned row was deleted
    async fn delete(&self, id: MessageId, owner: UserId) -> Result<bool, ConversationError>;
}

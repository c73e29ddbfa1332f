use std::sync::Arc;

use async_trait::async_trait;
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
use super::ports::ConversationRepository;
use super::ports::ConversationServicePort;
use super::ports::MessageRepository;
use crate::domain::user::models::UserId;

/// Concrete implementation of ConversationServicePort.
///
/// Generic over repositories for testability.
pub struct ConversationService<CR, MR>
where
    CR: ConversationRepository,
    MR: MessageRepository,
{
    conversation_repository: Arc<CR>,
    message_repository: Arc<MR>,
}

impl<CR, MR> ConversationService<CR, MR>
where
    CR: ConversationRepository,
    MR: MessageRepository,
{
    pub fn new(conversation_repository: Arc<CR>, message_repository: Arc<MR>) -> Self {
        Self {
            conversation_repository,
            message_repository,
        }
    }

    async fn owned_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
    ) -> Result<Conversation, ConversationError> {
        self.conversation_repository
            .find_by_id(id, owner)
            .await?
            .ok_or(ConversationError::NotFound(id))
    }
}

#[async_trait]
impl<CR, MR> ConversationServicePort for ConversationService<CR, MR>
where
    CR: ConversationRepository + 'static,
    MR: MessageRepository + 'static,
{
    async fn create_conversation(
        &self,
        owner: UserId,
        command: CreateConversationCommand,
    ) -> Result<Conversation, ConversationError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: ConversationId::new(),
            owner_id: owner,
            title: command.title,
            created_at: now,
            updated_at: now,
        };

        self.conversation_repository.create(conversation).await
    }

    async fn list_conversations(&self, owner: UserId) -> Result<Vec<Conversation>, ConversationError> {
        self.conversation_repository.find_by_owner(owner).await
    }

    async fn get_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
    ) -> Result<ConversationDetails, ConversationError> {
        let conversation = self.owned_conversation(owner, id).await?;
        let messages = self.message_repository.find_by_conversation(id).await?;

        Ok(ConversationDetails {
            conversation,
            messages,
        })
    }

    async fn rename_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
        title: ConversationTitle,
    ) -> Result<Conversation, ConversationError> {
        self.conversation_repository
            .update_title(id, owner, title, Utc::now())
            .await?
            .ok_or(ConversationError::NotFound(id))
    }

    async fn delete_conversation(
        &self,
        owner: UserId,
        id: ConversationId,
    ) -> Result<(), ConversationError> {
        if !self.conversation_repository.delete(id, owner).await? {
            return Err(ConversationError::NotFound(id));
        }

        tracing::debug!(conversation_id = %id, owner = %owner, "Conversation deleted");
        Ok(())
    }

    async fn add_message(
        &self,
        owner: UserId,
        conversation_id: ConversationId,
        command: AddMessageCommand,
    ) -> Result<Message, ConversationError> {
        self.owned_conversation(owner, conversation_id).await?;

        let now = Utc::now();
        let message = Message {
            id: MessageId::new(),
            conversation_id,
            role: command.role,
            content: command.content,
            created_at: now,
            updated_at: now,
        };

        self.message_repository.create(message).await
    }

    async fn list_messages(
        &self,
        owner: UserId,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ConversationError> {
        self.owned_conversation(owner, conversation_id).await?;
        self.message_repository
            .find_by_conversation(conversation_id)
            .await
    }

    async fn get_message(&self, owner: UserId, id: MessageId) -> Result<Message, ConversationError> {
        self.message_repository
            .find_by_id(id, owner)
            .await?
            .ok_or(ConversationError::MessageNotFound(id))
    }

    async fn update_message(
        &self,
        owner: UserId,
        id: MessageId,
        content: MessageContent,
    ) -> Result<Message, ConversationError> {
        self.message_repository
            .update_content(id, owner, content, Utc::now())
            .await?
            .ok_or(ConversationError::MessageNotFound(id))
    }

    async fn delete_message(&self, owner: UserId, id: MessageId) -> Result<(), ConversationError> {
        if !self.message_repository.delete(id, owner).await? {
            return Err(ConversationError::MessageNotFound(id));
        }
        Ok(())
    }
}

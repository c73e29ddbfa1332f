use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::messages::MessageData;
use crate::domain::conversation::models::Conversation;
use crate::domain::conversation::models::ConversationDetails;

pub mod create_conversation;
pub mod delete_conversation;
pub mod get_conversation;
pub mod list_conversations;
pub mod update_conversation;

pub use create_conversation::create_conversation;
pub use delete_conversation::delete_conversation;
pub use get_conversation::get_conversation;
pub use list_conversations::list_conversations;
pub use update_conversation::update_conversation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationData {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationData {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            title: conversation.title.as_str().to_string(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationDetailsData {
    #[serde(flatten)]
    pub conversation: ConversationData,
    pub messages: Vec<MessageData>,
}

impl From<&ConversationDetails> for ConversationDetailsData {
    fn from(details: &ConversationDetails) -> Self {
        Self {
            conversation: (&details.conversation).into(),
            messages: details.messages.iter().map(MessageData::from).collect(),
        }
    }
}

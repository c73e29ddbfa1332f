use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::conversation::errors::MessageContentError;
use crate::domain::conversation::models::Message;
use crate::inbound::http::handlers::ApiError;

pub mod create_message;
pub mod delete_message;
pub mod get_message;
pub mod list_messages;
pub mod update_message;

pub use create_message::create_message;
pub use delete_message::delete_message;
pub use get_message::get_message;
pub use list_messages::list_messages;
pub use update_message::update_message;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Message> for MessageData {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            conversation_id: message.conversation_id.to_string(),
            role: message.role.as_str().to_string(),
            content: message.content.as_str().to_string(),
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

impl From<MessageContentError> for ApiError {
    fn from(err: MessageContentError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid message content: {err}"))
    }
}

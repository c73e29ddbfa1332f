use thiserror::Error;

use super::models::ConversationId;
use super::models::MessageId;

/// Error for ConversationId and MessageId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for ConversationTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title is empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for MessageContent validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageContentError {
    #[error("Message content is empty")]
    Empty,

    #[error("Message content too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role '{0}', expected one of: user, assistant, system")]
    Unknown(String),
}

/// Top-level error for conversation and message operations
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}

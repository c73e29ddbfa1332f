use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::MessageData;
use crate::domain::conversation::errors::MessageContentError;
use crate::domain::conversation::errors::RoleError;
use crate::domain::conversation::models::AddMessageCommand;
use crate::domain::conversation::models::ConversationId;
use crate::domain::conversation::models::MessageContent;
use crate::domain::conversation::models::Role;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_message(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<String>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let conversation_id = ConversationId::from_string(&conversation_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .conversation_service
        .add_message(caller.user_id, conversation_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref message| ApiSuccess::new(StatusCode::CREATED, message.into()))
}

/// HTTP request body for appending a message (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateMessageRequest {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateMessageRequestError {
    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid message content: {0}")]
    Content(#[from] MessageContentError),
}

impl CreateMessageRequest {
    fn try_into_command(self) -> Result<AddMessageCommand, ParseCreateMessageRequestError> {
        let role = self.role.parse::<Role>()?;
        let content = MessageContent::new(self.content)?;
        Ok(AddMessageCommand { role, content })
    }
}

impl From<ParseCreateMessageRequestError> for ApiError {
    fn from(err: ParseCreateMessageRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

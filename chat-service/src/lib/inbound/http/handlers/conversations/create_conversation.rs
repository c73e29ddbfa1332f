use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ConversationData;
use crate::domain::conversation::errors::TitleError;
use crate::domain::conversation::models::ConversationTitle;
use crate::domain::conversation::models::CreateConversationCommand;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateConversationRequest>,
) -> Result<ApiSuccess<ConversationData>, ApiError> {
    state
        .conversation_service
        .create_conversation(caller.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref conversation| ApiSuccess::new(StatusCode::CREATED, conversation.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateConversationRequest {
    title: String,
}

impl CreateConversationRequest {
    fn try_into_command(self) -> Result<CreateConversationCommand, TitleError> {
        Ok(CreateConversationCommand {
            title: ConversationTitle::new(self.title)?,
        })
    }
}

impl From<TitleError> for ApiError {
    fn from(err: TitleError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid title: {err}"))
    }
}

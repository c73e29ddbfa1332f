use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::MessageData;
use crate::domain::conversation::models::MessageContent;
use crate::domain::conversation::models::MessageId;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Replace a message's content; its role is fixed once written.
pub async fn update_message(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(message_id): Path<String>,
    Json(body): Json<UpdateMessageRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let message_id =
        MessageId::from_string(&message_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let content = MessageContent::new(body.content)?;

    state
        .conversation_service
        .update_message(caller.user_id, message_id, content)
        .await
        .map_err(ApiError::from)
        .map(|ref message| ApiSuccess::new(StatusCode::OK, message.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateMessageRequest {
    content: String,
}

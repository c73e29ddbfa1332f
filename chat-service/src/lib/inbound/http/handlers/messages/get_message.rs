use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::MessageData;
use crate::domain::conversation::models::MessageId;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_message(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(message_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let message_id =
        MessageId::from_string(&message_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .conversation_service
        .get_message(caller.user_id, message_id)
        .await
        .map_err(ApiError::from)
        .map(|ref message| ApiSuccess::new(StatusCode::OK, message.into()))
}

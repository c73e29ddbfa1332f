use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::MessageData;
use crate::domain::conversation::models::ConversationId;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<String>,
) -> Result<ApiSuccess<Vec<MessageData>>, ApiError> {
    let conversation_id = ConversationId::from_string(&conversation_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .conversation_service
        .list_messages(caller.user_id, conversation_id)
        .await
        .map_err(ApiError::from)
        .map(|messages| {
            ApiSuccess::new(StatusCode::OK, messages.iter().map(MessageData::from).collect())
        })
}

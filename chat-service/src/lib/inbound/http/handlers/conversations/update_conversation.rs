use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ConversationData;
use crate::domain::conversation::models::ConversationId;
use crate::domain::conversation::models::ConversationTitle;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_conversation(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<String>,
    Json(body): Json<UpdateConversationRequest>,
) -> Result<ApiSuccess<ConversationData>, ApiError> {
    let conversation_id = ConversationId::from_string(&conversation_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let title = ConversationTitle::new(body.title)?;

    state
        .conversation_service
        .rename_conversation(caller.user_id, conversation_id, title)
        .await
        .map_err(ApiError::from)
        .map(|ref conversation| ApiSuccess::new(StatusCode::OK, conversation.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateConversationRequest {
    title: String,
}

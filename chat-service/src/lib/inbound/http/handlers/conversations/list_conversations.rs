use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ConversationData;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<ConversationData>>, ApiError> {
    state
        .conversation_service
        .list_conversations(caller.user_id)
        .await
        .map_err(ApiError::from)
        .map(|conversations| {
            ApiSuccess::new(
                StatusCode::OK,
                conversations.iter().map(ConversationData::from).collect(),
            )
        })
}

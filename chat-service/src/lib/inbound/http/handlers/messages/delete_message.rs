use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::conversation::models::MessageId;
use crate::domain::conversation::ports::ConversationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_message(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(message_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let message_id =
        MessageId::from_string(&message_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .conversation_service
        .delete_message(caller.user_id, message_id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData {
            message: "Message deleted".to_string(),
        },
    ))
}

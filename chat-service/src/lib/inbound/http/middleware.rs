use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that runs the access guard and adds the caller to request extensions.
///
/// A header that is not valid ASCII is treated as absent.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = state.access_guard.check(header).await?;

    let user_id = UserId::try_from(&principal.identity).map_err(|e| {
        tracing::warn!(identity = %principal.identity, error = %e, "Token subject is not a user id");
        ApiError::Unauthorized {
            message: "Invalid token subject".to_string(),
            code: "invalid_token",
        }
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

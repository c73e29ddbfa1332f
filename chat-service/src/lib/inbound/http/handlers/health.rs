use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Liveness probe. Always answers 200; a failing session store downgrades
/// the status instead of failing the probe.
pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthResponseData> {
    let session_store = match state.session_store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Session store health check failed");
            "down"
        }
    };

    let status = if session_store == "up" { "ok" } else { "degraded" };

    ApiSuccess::new(
        StatusCode::OK,
        HealthResponseData {
            status: status.to_string(),
            session_store: session_store.to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: String,
    pub session_store: String,
}

use std::sync::Arc;
use std::time::Duration;

use auth::AccessGuard;
use auth::SessionStore;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::account::login;
use super::handlers::account::logout;
use super::handlers::account::refresh;
use super::handlers::account::register;
use super::handlers::conversations::create_conversation;
use super::handlers::conversations::delete_conversation;
use super::handlers::conversations::get_conversation;
use super::handlers::conversations::list_conversations;
use super::handlers::conversations::update_conversation;
use super::handlers::health::health;
use super::handlers::messages::create_message;
use super::handlers::messages::delete_message;
use super::handlers::messages::get_message;
use super::handlers::messages::list_messages;
use super::handlers::messages::update_message;
use super::middleware::authenticate;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::conversation::ports::ConversationServicePort;

/// Shared state of every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub conversation_service: Arc<dyn ConversationServicePort>,
    pub access_guard: Arc<AccessGuard>,
    pub session_store: Arc<dyn SessionStore>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route(
            "/api/v1/conversations",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/api/v1/conversations/:conversation_id",
            get(get_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
        .route(
            "/api/v1/conversations/:conversation_id/messages",
            post(create_message).get(list_messages),
        )
        .route(
            "/api/v1/messages/:message_id",
            get(get_message).put(update_message).delete(delete_message),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

use std::sync::Arc;

use anyhow::Error;
use auth::Argon2PasswordHasher;
use auth::Clock;
use auth::SessionManager;
use auth::SystemClock;
use auth::TokenCodec;
use chat_service::config::Config;
use chat_service::domain::account::service::AccountService;
use chat_service::domain::conversation::service::ConversationService;
use chat_service::inbound::http::router::create_router;
use chat_service::inbound::http::router::AppState;
use chat_service::outbound::repositories::PostgresConversationRepository;
use chat_service::outbound::repositories::PostgresMessageRepository;
use chat_service::outbound::repositories::PostgresUserRepository;
use chat_service::outbound::session_store::connect_session_store;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chat-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Arc::new(Config::load()?);

    tracing::info!(
        http_port = config.server.http_port,
        session_store = ?config.session_store.provider,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session_store = connect_session_store(&config.session_store, Arc::clone(&clock)).await?;
    let codec = Arc::new(TokenCodec::new(config.jwt.secret.as_bytes(), clock)?);
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&session_store),
        codec,
        Arc::new(Argon2PasswordHasher::new()),
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let conversation_repository = Arc::new(PostgresConversationRepository::new(pg_pool.clone()));
    let message_repository = Arc::new(PostgresMessageRepository::new(pg_pool));

    let state = AppState {
        account_service: Arc::new(AccountService::new(user_repository, Arc::clone(&sessions))),
        conversation_service: Arc::new(ConversationService::new(
            conversation_repository,
            message_repository,
        )),
        access_guard: Arc::new(sessions.guard()),
        session_store,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        "Server Listening"
    );

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

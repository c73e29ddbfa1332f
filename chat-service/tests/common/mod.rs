#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Argon2PasswordHasher;
use auth::Identity;
use auth::InMemorySessionStore;
use auth::ManualClock;
use auth::SessionId;
use auth::SessionManager;
use auth::SessionStore;
use auth::StoreError;
use auth::TokenCodec;
use chat_service::domain::account::service::AccountService;
use chat_service::domain::conversation::errors::ConversationError;
use chat_service::domain::conversation::models::Conversation;
use chat_service::domain::conversation::models::ConversationId;
use chat_service::domain::conversation::models::ConversationTitle;
use chat_service::domain::conversation::models::Message;
use chat_service::domain::conversation::models::MessageContent;
use chat_service::domain::conversation::models::MessageId;
use chat_service::domain::conversation::ports::ConversationRepository;
use chat_service::domain::conversation::ports::MessageRepository;
use chat_service::domain::conversation::service::ConversationService;
use chat_service::domain::user::errors::UserError;
use chat_service::domain::user::models::EmailAddress;
use chat_service::domain::user::models::NewUser;
use chat_service::domain::user::models::User;
use chat_service::domain::user::models::UserId;
use chat_service::domain::user::ports::UserRepository;
use chat_service::inbound::http::router::create_router;
use chat_service::inbound::http::router::AppState;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tokio::sync::Mutex;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Spawn the application with an in-memory session store
    pub async fn spawn() -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(InMemorySessionStore::new(clock.clone()));
        Self::spawn_with(clock, store).await
    }

    /// Spawn the application with a session store that always fails
    pub async fn spawn_with_failing_store() -> Self {
        Self::spawn_with(Arc::new(ManualClock::starting_now()), Arc::new(FailingSessionStore)).await
    }

    async fn spawn_with(clock: Arc<ManualClock>, session_store: Arc<dyn SessionStore>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let codec = Arc::new(TokenCodec::new(TEST_SECRET, clock.clone()).unwrap());
        let sessions = Arc::new(SessionManager::new(
            session_store.clone(),
            codec,
            Arc::new(Argon2PasswordHasher::new()),
        ));

        let conversations = Arc::new(InMemoryConversationRepository::default());

        let state = AppState {
            account_service: Arc::new(AccountService::new(
                Arc::new(InMemoryUserRepository::default()),
                sessions.clone(),
            )),
            conversation_service: Arc::new(ConversationService::new(
                conversations.clone(),
                conversations,
            )),
            access_guard: Arc::new(sessions.guard()),
            session_store,
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            clock,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return its id
    pub async fn register(&self, email: &str) -> i64 {
        let response = self
            .post("/api/v1/auth/register")
            .json(&json!({
                "name": "Test User",
                "email": email,
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return the `data` object holding the token pair
    pub async fn login(&self, email: &str) -> Value {
        let response = self
            .post("/api/v1/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register and log in, returning the access token
    pub async fn access_token_for(&self, email: &str) -> String {
        self.register(email).await;
        self.login(email).await["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let user = User {
            id: UserId(users.len() as i64 + 1),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }
}

/// Conversations and messages in one place so message lookups can check
/// the owning conversation.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<Vec<Message>>,
}

impl InMemoryConversationRepository {
    async fn owns(&self, conversation_id: ConversationId, owner: UserId) -> bool {
        self.conversations
            .lock()
            .await
            .iter()
            .any(|c| c.id == conversation_id && c.owner_id == owner)
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, ConversationError> {
        self.conversations.lock().await.push(conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, ConversationError> {
        let conversations = self.conversations.lock().await;
        Ok(conversations
            .iter()
            .find(|c| c.id == id && c.owner_id == owner)
            .cloned())
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Conversation>, ConversationError> {
        let conversations = self.conversations.lock().await;
        let mut owned: Vec<Conversation> = conversations
            .iter()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn update_title(
        &self,
        id: ConversationId,
        owner: UserId,
        title: ConversationTitle,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Conversation>, ConversationError> {
        let mut conversations = self.conversations.lock().await;
        Ok(conversations
            .iter_mut()
            .find(|c| c.id == id && c.owner_id == owner)
            .map(|c| {
                c.title = title;
                c.updated_at = updated_at;
                c.clone()
            }))
    }

    async fn delete(&self, id: ConversationId, owner: UserId) -> Result<bool, ConversationError> {
        let mut conversations = self.conversations.lock().await;
        let before = conversations.len();
        conversations.retain(|c| !(c.id == id && c.owner_id == owner));
        let deleted = conversations.len() < before;
        drop(conversations);

        if deleted {
            self.messages
                .lock()
                .await
                .retain(|m| m.conversation_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl MessageRepository for InMemoryConversationRepository {
    async fn create(&self, message: Message) -> Result<Message, ConversationError> {
        self.messages.lock().await.push(message.clone());
        Ok(message)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, ConversationError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: MessageId,
        owner: UserId,
    ) -> Result<Option<Message>, ConversationError> {
        let message = self
            .messages
            .lock()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned();

        let Some(message) = message else {
            return Ok(None);
        };

        if self.owns(message.conversation_id, owner).await {
            Ok(Some(message))
        } else {
            Ok(None)
        }
    }

    async fn update_content(
        &self,
        id: MessageId,
        owner: UserId,
        content: MessageContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Message>, ConversationError> {
        if MessageRepository::find_by_id(self, id, owner).await?.is_none() {
            return Ok(None);
        }

        let mut messages = self.messages.lock().await;
        Ok(messages.iter_mut().find(|m| m.id == id).map(|m| {
            m.content = content;
            m.updated_at = updated_at;
            m.clone()
        }))
    }

    async fn delete(&self, id: MessageId, owner: UserId) -> Result<bool, ConversationError> {
        if MessageRepository::find_by_id(self, id, owner).await?.is_none() {
            return Ok(false);
        }

        self.messages.lock().await.retain(|m| m.id != id);
        Ok(true)
    }
}

/// Session store whose backend is permanently unreachable
pub struct FailingSessionStore;

fn unreachable_store() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn set(
        &self,
        _session_id: &SessionId,
        _identity: &Identity,
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn get(&self, _session_id: &SessionId) -> Result<Option<Identity>, StoreError> {
        Err(unreachable_store())
    }

    async fn delete(&self, _session_id: &SessionId) -> Result<bool, StoreError> {
        Err(unreachable_store())
    }

    async fn ttl(&self, _session_id: &SessionId) -> Result<Option<Duration>, StoreError> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable_store())
    }
}

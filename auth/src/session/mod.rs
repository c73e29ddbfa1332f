pub mod errors;
pub mod guard;
pub mod manager;
pub mod memory;
pub mod models;
pub mod redis;
pub mod store;

pub use self::errors::AuthError;
pub use self::errors::Outcome;
pub use self::errors::StoreError;
pub use self::errors::ValueError;
pub use self::guard::bearer_token;
pub use self::guard::AccessGuard;
pub use self::manager::SessionManager;
pub use self::memory::InMemorySessionStore;
pub use self::models::Identity;
pub use self::models::Principal;
pub use self::models::SessionId;
pub use self::models::TokenPair;
pub use self::redis::mask_redis_url;
pub use self::redis::RedisSessionStore;
pub use self::store::session_key;
pub use self::store::SessionStore;
pub use self::store::SESSION_TTL;

//! Session and token lifecycle library
//!
//! Provides the authentication core shared by services:
//! - Password verification (Argon2id)
//! - Signed access/refresh tokens (HS256 JWT)
//! - Server-side session records with a time-to-live (Redis or in-memory)
//! - Login, rotation and logout orchestration
//! - A per-request access guard
//!
//! A token alone never authorizes anything: the session record it names must
//! still be live in the store. Deleting the record revokes every token bound
//! to it immediately.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2PasswordHasher, CredentialVerifier};
//!
//! let hasher = Argon2PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//! use auth::{Identity, SessionId, SystemClock, TokenCodec, TokenKind};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Arc::new(SystemClock)).unwrap();
//! let token = codec.mint(&Identity::from(42_i64), &SessionId::generate(), TokenKind::Access).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.identity().as_str(), "42");
//! ```
//!
//! ## Session Lifecycle
//! ```
//! use std::sync::Arc;
//! use auth::{
//!     AccessGuard, Argon2PasswordHasher, Identity, InMemorySessionStore, SessionManager,
//!     SystemClock, TokenCodec,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let clock = Arc::new(SystemClock);
//! let codec = Arc::new(TokenCodec::new(b"secret_key_at_least_32_bytes_long!", clock.clone()).unwrap());
//! let store = Arc::new(InMemorySessionStore::new(clock));
//! let manager = SessionManager::new(store.clone(), codec.clone(), Arc::new(Argon2PasswordHasher::new()));
//! let guard = AccessGuard::new(codec, store);
//!
//! let pair = manager.login(&Identity::from(42_i64)).await.unwrap();
//! let header = format!("Bearer {}", pair.access_token);
//! assert_eq!(guard.check(Some(&header)).await.unwrap().identity.as_str(), "42");
//!
//! manager.logout(&pair.access_token).await.unwrap();
//! assert!(guard.check(Some(&header)).await.is_err());
//! # }
//! ```

pub mod clock;
pub mod jwt;
pub mod password;
pub mod session;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::IssuedToken;
pub use jwt::SessionClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use password::Argon2PasswordHasher;
pub use password::CredentialVerifier;
pub use password::DECOY_HASH;
pub use password::PasswordError;
pub use session::bearer_token;
pub use session::AccessGuard;
pub use session::AuthError;
pub use session::Identity;
pub use session::InMemorySessionStore;
pub use session::Outcome;
pub use session::Principal;
pub use session::SessionId;
pub use session::SessionManager;
pub use session::SessionStore;
pub use session::StoreError;
pub use session::TokenPair;
pub use session::SESSION_TTL;

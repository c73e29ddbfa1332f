use async_trait::async_trait;
use auth::TokenPair;

use super::errors::AccountError;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use crate::domain::user::models::User;

/// Port for account and session operations exposed to request handlers.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Returns
    /// Created user
    ///
    /// # Errors
    /// * `User(EmailAlreadyExists)` - Email is already registered
    /// * `Password` - Hashing failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError>;

    /// Check credentials and open a session.
    ///
    /// # Returns
    /// Access/refresh pair for the new session
    ///
    /// # Errors
    /// * `Auth(InvalidCredentials)` - Unknown email or wrong password
    /// * `Auth(StoreUnavailable)` - Session store could not be reached
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AccountError>;

    /// Rotate a session using its refresh token.
    ///
    /// # Errors
    /// * `Auth(_)` - See [`auth::SessionManager::refresh`]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError>;

    /// Close the session a token belongs to.
    ///
    /// # Errors
    /// * `Auth(_)` - See [`auth::SessionManager::logout`]
    async fn logout(&self, token: &str) -> Result<(), AccountError>;
}

use auth::AuthError;
use auth::PasswordError;
use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Error for registration and session operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),
}

use thiserror::Error;

use crate::jwt::TokenError;
use crate::password::PasswordError;

/// Error for identifier validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Error raised by session store adapters.
///
/// Only transport or infrastructure failures surface here; an absent
/// session is a normal `None`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// How an authentication failure must be reported at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The caller is not authorized; retry is up to the client.
    Unauthorized,
    /// The server could not decide; never reported as an auth failure.
    ServerFault,
}

/// Session lifecycle and access check errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Session expired or invalid")]
    SessionExpired,

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error("Credential verification failed: {0}")]
    Password(#[from] PasswordError),
}

impl AuthError {
    /// Classify the error for the request boundary.
    pub fn outcome(&self) -> Outcome {
        match self {
            AuthError::StoreUnavailable(_) | AuthError::Password(_) => Outcome::ServerFault,
            AuthError::Token(TokenError::EncodingFailed(_) | TokenError::MissingSecret) => {
                Outcome::ServerFault
            }
            AuthError::MissingCredential(_)
            | AuthError::InvalidCredentials
            | AuthError::Token(_)
            | AuthError::SessionExpired => Outcome::Unauthorized,
        }
    }

    /// Stable machine-readable code for clients.
    ///
    /// `token_expired` means a refresh may succeed; the other unauthorized
    /// codes require a new login.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential(_) => "missing_credential",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Token(TokenError::Expired) => "token_expired",
            AuthError::Token(TokenError::EncodingFailed(_) | TokenError::MissingSecret) => {
                "token_encoding_failed"
            }
            AuthError::Token(_) => "invalid_token",
            AuthError::SessionExpired => "session_expired",
            AuthError::StoreUnavailable(_) => "session_store_unavailable",
            AuthError::Password(_) => "credential_verification_failed",
        }
    }

    /// True when the token was genuine but past its lifetime.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::Token(TokenError::Expired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_is_server_fault() {
        let error = AuthError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(error.outcome(), Outcome::ServerFault);
        assert_eq!(error.code(), "session_store_unavailable");
    }

    #[test]
    fn test_token_failures_are_unauthorized() {
        for error in [
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::MalformedClaims("missing field `sid`".to_string()),
        ] {
            assert_eq!(AuthError::from(error).outcome(), Outcome::Unauthorized);
        }
        assert_eq!(AuthError::SessionExpired.outcome(), Outcome::Unauthorized);
        assert_eq!(
            AuthError::MissingCredential("no header").outcome(),
            Outcome::Unauthorized
        );
    }

    #[test]
    fn test_expired_is_distinguishable() {
        assert!(AuthError::from(TokenError::Expired).is_expired());
        assert_eq!(AuthError::from(TokenError::Expired).code(), "token_expired");
        assert!(!AuthError::from(TokenError::InvalidSignature).is_expired());
        assert_eq!(
            AuthError::from(TokenError::InvalidSignature).code(),
            "invalid_token"
        );
    }
}

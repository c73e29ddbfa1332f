use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token minting and verification.
///
/// `Expired` is kept apart from the other rejections: an expired token was
/// genuine and the client may recover through a refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    MissingSecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token claims: {0}")]
    MalformedClaims(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Wrong token kind: expected {expected}, found {found}")]
    WrongKind { expected: TokenKind, found: TokenKind },
}

use std::sync::Arc;

use tracing::debug;

use super::errors::AuthError;
use super::models::Principal;
use super::store::SessionStore;
use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization` header value.
///
/// Only the exact form `Bearer <token>` is accepted: one space, a
/// non-empty token and nothing after it.
///
/// # Errors
/// * `MissingCredential` - Header is absent or not a bearer credential
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential("authorization header missing"))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::MissingCredential("expected a bearer token"))?;

    if scheme != BEARER_SCHEME || token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MissingCredential("expected a bearer token"));
    }

    Ok(token)
}

/// Per-request gate for protected operations.
///
/// A request passes only when its access token is genuine, unexpired and
/// still backed by a live session record, so logout and rotation take
/// effect before the token itself runs out.
#[derive(Clone)]
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
    store: Arc<dyn SessionStore>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>, store: Arc<dyn SessionStore>) -> Self {
        Self { codec, store }
    }

    /// Authorize a request from its `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingCredential` - No well-formed bearer credential
    /// * See [`AccessGuard::check_token`]
    pub async fn check(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(authorization)?;
        self.check_token(token).await
    }

    /// Authorize a request from a raw access token.
    ///
    /// # Returns
    /// Principal the request acts on behalf of
    ///
    /// # Errors
    /// * `Token` - Token is invalid, expired or a refresh token
    /// * `SessionExpired` - Backing session is gone or owned by someone else
    /// * `StoreUnavailable` - Session store could not be reached
    pub async fn check_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.codec.verify_kind(token, TokenKind::Access)?;

        let owner = self.store.get(claims.session_id()).await?;

        match owner {
            Some(owner) if &owner == claims.identity() => Ok(claims.into_principal()),
            Some(_) | None => {
                debug!(identity = %claims.identity(), "Access token without live session");
                Err(AuthError::SessionExpired)
            }
        }
    }
}

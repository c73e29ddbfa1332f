use std::sync::Arc;

use tracing::info;
use tracing::warn;

use super::errors::AuthError;
use super::guard::AccessGuard;
use super::models::Identity;
use super::models::SessionId;
use super::models::TokenPair;
use super::store::SessionStore;
use super::store::SESSION_TTL;
use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;
use crate::password::CredentialVerifier;
use crate::password::DECOY_HASH;

/// Creates, rotates and destroys sessions.
///
/// The manager is the only writer of session records. Every issued token
/// pair is bound to exactly one fresh session id; a session is never
/// extended in place.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    codec: Arc<TokenCodec>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionManager {
    /// Create a new session manager with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Session record store
    /// * `codec` - Token codec holding the signing secret
    /// * `verifier` - Password check used by [`SessionManager::authenticate`]
    ///
    /// # Returns
    /// Configured session manager instance
    pub fn new(
        store: Arc<dyn SessionStore>,
        codec: Arc<TokenCodec>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            store,
            codec,
            verifier,
        }
    }

    /// Access guard sharing this manager's codec and store.
    pub fn guard(&self) -> AccessGuard {
        AccessGuard::new(self.codec.clone(), self.store.clone())
    }

    /// Open a new session for `identity`.
    ///
    /// Existing sessions of the same identity are left alone.
    ///
    /// # Returns
    /// Access/refresh pair bound to the new session
    ///
    /// # Errors
    /// * `Token` - Token encoding failed (nothing was written)
    /// * `StoreUnavailable` - Session record could not be written
    pub async fn login(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let session_id = SessionId::generate();

        // Both tokens are minted before the record exists, so an encoding
        // failure leaves no orphaned session behind.
        let access = self.codec.issue(identity, &session_id, TokenKind::Access)?;
        let refresh = self.codec.issue(identity, &session_id, TokenKind::Refresh)?;

        self.store.set(&session_id, identity, SESSION_TTL).await?;

        info!(identity = %identity, "Session opened");

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
            session_id,
        })
    }

    /// Check a password against its stored hash and open a session.
    ///
    /// # Arguments
    /// * `password` - Plaintext supplied by the client
    /// * `stored_hash` - Hash held by the identity record store
    /// * `identity` - Identity the hash belongs to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash is unreadable
    /// * Any error from [`SessionManager::login`]
    pub async fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<TokenPair, AuthError> {
        if !self.verifier.verify(password, stored_hash)? {
            info!(identity = %identity, "Password rejected");
            return Err(AuthError::InvalidCredentials);
        }

        self.login(identity).await
    }

    /// Reject a login attempt for which no identity record exists.
    ///
    /// Runs the same password check as [`SessionManager::authenticate`]
    /// against [`DECOY_HASH`], so timing does not tell unknown accounts
    /// apart from wrong passwords.
    ///
    /// # Returns
    /// Always `InvalidCredentials`
    pub fn reject_unknown(&self, password: &str) -> AuthError {
        // The outcome is irrelevant; only the work matters.
        let _ = self.verifier.verify(password, DECOY_HASH);
        AuthError::InvalidCredentials
    }

    /// Rotate a session: consume the refresh token and issue a new pair.
    ///
    /// The old record is deleted before the new one is written. If issuing
    /// the new session fails after that, the caller is logged out and has to
    /// log in again.
    ///
    /// # Errors
    /// * `Token` - Refresh token is invalid, expired or an access token
    /// * `SessionExpired` - Backing session is gone or owned by someone else
    /// * `StoreUnavailable` - Session store could not be reached
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.codec.verify_kind(refresh_token, TokenKind::Refresh)?;

        let owner = self
            .store
            .get(claims.session_id())
            .await?
            .ok_or(AuthError::SessionExpired)?;

        if &owner != claims.identity() {
            warn!(
                identity = %claims.identity(),
                "Refresh token identity does not match its session"
            );
            return Err(AuthError::SessionExpired);
        }

        // Only the caller whose delete removed the record may reissue.
        // A concurrent refresh with the same token loses here.
        if !self.store.delete(claims.session_id()).await? {
            warn!(identity = %claims.identity(), "Refresh token already consumed");
            return Err(AuthError::SessionExpired);
        }

        info!(identity = %claims.identity(), "Session rotated");

        self.login(claims.identity()).await
    }

    /// Close the session a token belongs to.
    ///
    /// Accepts either token kind. Closing an already closed session succeeds.
    ///
    /// # Errors
    /// * `Token` - Token is invalid or expired
    /// * `StoreUnavailable` - Session store could not be reached
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.codec.verify(token)?;

        let removed = self.store.delete(claims.session_id()).await?;

        info!(identity = %claims.identity(), removed, "Session closed");
        Ok(())
    }
}

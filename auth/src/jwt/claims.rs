use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::session::Identity;
use crate::session::Principal;
use crate::session::SessionId;

/// Access token lifetime in minutes.
pub const ACCESS_TOKEN_MINUTES: i64 = 15;

/// Refresh token lifetime in days.
pub const REFRESH_TOKEN_DAYS: i64 = 7;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token authorizing individual requests.
    Access,
    /// Long-lived token that can only mint a new pair.
    Refresh,
}

impl TokenKind {
    /// Fixed lifetime for tokens of this kind.
    pub fn lifetime(self) -> Duration {
        match self {
            TokenKind::Access => Duration::minutes(ACCESS_TOKEN_MINUTES),
            TokenKind::Refresh => Duration::days(REFRESH_TOKEN_DAYS),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set carried by every session token.
///
/// Decoding is strict: a missing, mistyped or empty field rejects the token
/// instead of falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (authenticated identity)
    pub sub: Identity,

    /// Session the token is bound to
    pub sid: SessionId,

    /// Access or refresh
    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims issued at `now` with the lifetime of `kind`.
    ///
    /// # Arguments
    /// * `identity` - Authenticated principal
    /// * `session_id` - Backing session record
    /// * `kind` - Access or refresh
    /// * `now` - Issue instant
    ///
    /// # Returns
    /// Claims with iat and exp set
    pub fn issue(
        identity: Identity,
        session_id: SessionId,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Self {
        let expiration = now + kind.lifetime();

        Self {
            sub: identity,
            sid: session_id,
            kind,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.sub
    }

    pub fn session_id(&self) -> &SessionId {
        &self.sid
    }

    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// The expiration second itself is already past the lifetime.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn into_principal(self) -> Principal {
        Principal {
            identity: self.sub,
            session_id: self.sid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_at(kind: TokenKind, timestamp: i64) -> SessionClaims {
        SessionClaims::issue(
            Identity::from(42_i64),
            SessionId::new("abc123").unwrap(),
            kind,
            DateTime::from_timestamp(timestamp, 0).unwrap(),
        )
    }

    #[test]
    fn test_issue_access_lifetime() {
        let claims = issue_at(TokenKind::Access, 1_000_000);

        assert_eq!(claims.sub.as_str(), "42");
        assert_eq!(claims.iat, 1_000_000);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_issue_refresh_lifetime() {
        let claims = issue_at(TokenKind::Refresh, 1_000_000);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let claims = issue_at(TokenKind::Access, 1_000);
        let exp = claims.exp;

        assert!(!claims.is_expired(exp - 1));
        assert!(claims.is_expired(exp));
        assert!(claims.is_expired(exp + 1));
    }

    #[test]
    fn test_kind_wire_names() {
        let claims = issue_at(TokenKind::Refresh, 1_000);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["kind"], "refresh");
        assert_eq!(value["sub"], "42");
        assert_eq!(value["sid"], "abc123");
    }

    #[test]
    fn test_decode_rejects_missing_session() {
        let value = serde_json::json!({
            "sub": "42",
            "kind": "access",
            "iat": 1,
            "exp": 2
        });
        assert!(serde_json::from_value::<SessionClaims>(value).is_err());
    }

    #[test]
    fn test_decode_rejects_mistyped_fields() {
        let numeric_sub = serde_json::json!({
            "sub": 42,
            "sid": "abc",
            "kind": "access",
            "iat": 1,
            "exp": 2
        });
        assert!(serde_json::from_value::<SessionClaims>(numeric_sub).is_err());

        let unknown_kind = serde_json::json!({
            "sub": "42",
            "sid": "abc",
            "kind": "admin",
            "iat": 1,
            "exp": 2
        });
        assert!(serde_json::from_value::<SessionClaims>(unknown_kind).is_err());
    }
}

use std::time::Duration;

use async_trait::async_trait;

use super::errors::StoreError;
use super::models::Identity;
use super::models::SessionId;

/// Key namespace for session records.
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Lifetime of a freshly created session record (7 days).
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Store key for a session record: `session:<session_id>`.
pub fn session_key(session_id: &SessionId) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

/// Key-value port holding live session records.
///
/// Records are replaced wholesale and never partially updated, so the
/// store's own per-key atomicity is the only coordination needed between
/// concurrent requests. Expiry is enforced by the store itself.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Write a session record with a time-to-live.
    ///
    /// # Arguments
    /// * `session_id` - Record key
    /// * `identity` - Owning identity (record value)
    /// * `ttl` - Lifetime after which the store drops the record
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn set(
        &self,
        session_id: &SessionId,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// Look up the owner of a live session.
    ///
    /// # Returns
    /// Owning identity, or None if the record is absent or expired
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn get(&self, session_id: &SessionId) -> Result<Option<Identity>, StoreError>;

    /// Remove a session record. Removing an absent record succeeds.
    ///
    /// # Returns
    /// True if this call removed a live record. When concurrent callers
    /// delete the same key, exactly one of them sees true.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn delete(&self, session_id: &SessionId) -> Result<bool, StoreError>;

    /// Remaining lifetime of a session record.
    ///
    /// # Returns
    /// Remaining time-to-live, or None if the record is absent
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn ttl(&self, session_id: &SessionId) -> Result<Option<Duration>, StoreError>;

    /// Check connectivity.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn ping(&self) -> Result<(), StoreError>;
}

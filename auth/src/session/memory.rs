use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::models::Identity;
use super::models::SessionId;
use super::store::session_key;
use super::store::SessionStore;
use crate::clock::Clock;

struct Entry {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// Process-local session store.
///
/// Entries past their deadline are invisible immediately and evicted lazily.
/// Suitable for development and tests; sessions do not survive a restart and
/// are not shared between processes.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry.
    ///
    /// # Returns
    /// Number of entries removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    fn deadline(&self, ttl: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(
        &self,
        session_id: &SessionId,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let entry = Entry {
            identity: identity.clone(),
            expires_at: self.deadline(ttl),
        };
        self.entries
            .write()
            .await
            .insert(session_key(session_id), entry);
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<Identity>, StoreError> {
        let key = session_key(session_id);
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.identity.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(&key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(&key);
        }
        Ok(None)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let removed = self.entries.write().await.remove(&session_key(session_id));
        Ok(removed.is_some_and(|entry| entry.expires_at > now))
    }

    async fn ttl(&self, session_id: &SessionId) -> Result<Option<Duration>, StoreError> {
        let now = self.clock.now();
        let entries = self.entries.read().await;

        Ok(entries
            .get(&session_key(session_id))
            .and_then(|entry| (entry.expires_at - now).to_std().ok())
            .filter(|remaining| !remaining.is_zero()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::store::SESSION_TTL;

    fn store() -> (InMemorySessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        (InMemorySessionStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let (store, _clock) = store();
        let session_id = SessionId::generate();
        let identity = Identity::from(42_i64);

        store.set(&session_id, &identity, SESSION_TTL).await.unwrap();
        assert_eq!(store.get(&session_id).await.unwrap(), Some(identity));

        assert!(store.delete(&session_id).await.unwrap());
        assert_eq!(store.get(&session_id).await.unwrap(), None);
        assert!(!store.delete(&session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let (store, _clock) = store();
        assert!(!store.delete(&SessionId::generate()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_expired_reports_nothing_removed() {
        let (store, clock) = store();
        let session_id = SessionId::generate();

        store
            .set(&session_id, &Identity::from(1_i64), Duration::from_secs(60))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(60));

        assert!(!store.delete(&session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_passive_expiry() {
        let (store, clock) = store();
        let session_id = SessionId::generate();

        store
            .set(&session_id, &Identity::from(1_i64), Duration::from_secs(60))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(59));
        assert!(store.get(&session_id).await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(1));
        assert!(store.get(&session_id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_ttl_counts_down() {
        let (store, clock) = store();
        let session_id = SessionId::generate();

        store
            .set(&session_id, &Identity::from(1_i64), SESSION_TTL)
            .await
            .unwrap();
        assert_eq!(store.ttl(&session_id).await.unwrap(), Some(SESSION_TTL));

        clock.advance(chrono::Duration::days(1));
        assert_eq!(
            store.ttl(&session_id).await.unwrap(),
            Some(SESSION_TTL - Duration::from_secs(24 * 60 * 60))
        );

        assert_eq!(store.ttl(&SessionId::generate()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (store, clock) = store();

        store
            .set(&SessionId::generate(), &Identity::from(1_i64), Duration::from_secs(10))
            .await
            .unwrap();
        store
            .set(&SessionId::generate(), &Identity::from(2_i64), SESSION_TTL)
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(11));

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}

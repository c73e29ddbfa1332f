use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use tracing::info;

use super::errors::StoreError;
use super::models::Identity;
use super::models::SessionId;
use super::store::session_key;
use super::store::SessionStore;

/// Session store backed by Redis.
///
/// Each record is a plain string key `<prefix>session:<id>` holding the
/// identity, written with `SET ... EX` so Redis drops it on its own.
/// The connection manager reconnects transparently and is cheap to clone.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl RedisSessionStore {
    /// Connect to Redis.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (`redis://[:password@]host:port[/db]`)
    /// * `key_prefix` - Namespace prepended to every session key (may be empty)
    ///
    /// # Errors
    /// * `Unavailable` - URL is invalid or the server cannot be reached
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        info!(url = %mask_redis_url(url), "Connecting to Redis session store");

        let client = Client::open(url).map_err(map_err)?;
        let conn = ConnectionManager::new(client).await.map_err(map_err)?;

        info!("Connected to Redis session store");
        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, session_id: &SessionId) -> String {
        format!("{}{}", self.key_prefix, session_key(session_id))
    }
}

fn map_err(e: redis::RedisError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(
        &self,
        session_id: &SessionId,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();
        // EX 0 is rejected by Redis.
        let seconds = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&key, identity.as_str(), seconds)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<Identity>, StoreError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();

        let value: Option<String> = conn.get(&key).await.map_err(map_err)?;
        Ok(value.and_then(|value| Identity::new(value).ok()))
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, StoreError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();

        // DEL is atomic per key: of two concurrent callers only one counts 1.
        let removed: u64 = conn.del(&key).await.map_err(map_err)?;
        Ok(removed > 0)
    }

    async fn ttl(&self, session_id: &SessionId) -> Result<Option<Duration>, StoreError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();

        // -2: no such key, -1: key without expiry.
        let seconds: i64 = conn.ttl(&key).await.map_err(map_err)?;
        Ok(u64::try_from(seconds).ok().map(Duration::from_secs))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_err)?;

        if pong != "PONG" {
            return Err(StoreError::Unavailable(format!(
                "unexpected PING reply: {pong}"
            )));
        }
        Ok(())
    }
}

/// Mask the password in a Redis URL for safe logging.
pub fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}

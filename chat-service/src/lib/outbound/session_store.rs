use std::sync::Arc;
use std::time::Duration;

use auth::session::RedisSessionStore;
use auth::Clock;
use auth::InMemorySessionStore;
use auth::SessionStore;
use auth::StoreError;

use crate::config::SessionStoreConfig;
use crate::config::SessionStoreProvider;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Build the session store selected by configuration.
///
/// # Arguments
/// * `config` - Session store section of the service configuration
/// * `clock` - Clock used by the in-memory store for expiry
///
/// # Errors
/// * `Unavailable` - Redis URL missing or connection failed
pub async fn connect_session_store(
    config: &SessionStoreConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn SessionStore>, StoreError> {
    match config.provider {
        SessionStoreProvider::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| StoreError::Unavailable("redis_url is not configured".to_string()))?;

            let store = RedisSessionStore::connect(url, config.key_prefix.clone()).await?;
            Ok(Arc::new(store))
        }
        SessionStoreProvider::Memory => {
            tracing::warn!("Using in-memory session store; sessions are lost on restart");
            let store = Arc::new(InMemorySessionStore::new(clock));
            spawn_purge_task(&store);
            Ok(store)
        }
    }
}

/// Sweep expired sessions once a minute until the store is dropped.
fn spawn_purge_task(store: &Arc<InMemorySessionStore>) {
    let store = Arc::downgrade(store);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let Some(store) = store.upgrade() else {
                break;
            };
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions purged");
            }
        }
    });
}

//! In-memory cache of the last known directory entries.
//!
//! Owned by whoever composes the application and passed to the code that
//! needs it; there is no process-wide instance. Populate it once at startup
//! with [`EntryRepository::set`] and refresh on demand.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::app_config::AppConfig;
use crate::facility::Facility;

#[derive(Debug)]
struct CachedEntries {
    entries: Arc<Vec<Facility>>,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct EntryRepository {
    ttl: Duration,
    state: RwLock<Option<CachedEntries>>,
}

impl EntryRepository {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(Duration::from_secs(config.entries_cache_ttl_secs))
    }

    /// Returns the cached entries, or `None` when nothing is cached, the
    /// cache was invalidated, or the snapshot is older than the TTL.
    pub async fn get(&self) -> Option<Arc<Vec<Facility>>> {
        let state = self.state.read().await;
        let cached = state.as_ref()?;
        if cached.stored_at.elapsed() > self.ttl {
            tracing::debug!(ttl_secs = self.ttl.as_secs(), "entry cache expired");
            return None;
        }
        Some(Arc::clone(&cached.entries))
    }

    /// Replaces the cached snapshot.
    pub async fn set(&self, entries: Vec<Facility>) {
        let count = entries.len();
        *self.state.write().await = Some(CachedEntries {
            entries: Arc::new(entries),
            stored_at: Instant::now(),
        });
        tracing::debug!(count, "entry cache updated");
    }

    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }
}

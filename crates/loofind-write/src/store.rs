//! Minimal string key-value storage used for device, rate-limit and breaker state.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// The only storage primitive the write path depends on.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store; state is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Wraps a store so that every key is hashed under a namespace before it
/// reaches the backend.
///
/// The stored key is the first 32 hex characters of
/// `SHA-256("<namespace>:<key>")`, so the backend never sees the logical
/// key names.
#[derive(Debug)]
pub struct NamespacedStore<S> {
    inner: S,
    namespace: String,
}

impl<S> NamespacedStore<S> {
    pub fn new(inner: S, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn storage_key(&self, key: &str) -> String {
        let digest = format!("{:x}", Sha256::digest(format!("{}:{key}", self.namespace)));
        digest[..32].to_owned()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for NamespacedStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.storage_key(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.storage_key(key), value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.storage_key(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("deviceId").await.unwrap(), None);

        store.set("deviceId", "abc").await.unwrap();
        assert_eq!(store.get("deviceId").await.unwrap().as_deref(), Some("abc"));

        store.set("deviceId", "def").await.unwrap();
        assert_eq!(store.get("deviceId").await.unwrap().as_deref(), Some("def"));
        assert_eq!(store.len().await, 1);

        store.remove("deviceId").await.unwrap();
        assert!(store.is_empty().await);
        // Removing a missing key is not an error.
        store.remove("deviceId").await.unwrap();
    }

    #[test]
    fn storage_key_is_truncated_sha256_of_namespaced_key() {
        let store = NamespacedStore::new(MemoryStore::new(), "loofind");
        let expected = format!("{:x}", Sha256::digest(b"loofind:deviceId"));
        let key = store.storage_key("deviceId");
        assert_eq!(key.len(), 32);
        assert_eq!(key, expected[..32]);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn namespaces_do_not_collide() {
        let a = NamespacedStore::new(MemoryStore::new(), "alpha");
        let b = NamespacedStore::new(MemoryStore::new(), "beta");
        assert_ne!(a.storage_key("deviceId"), b.storage_key("deviceId"));
        assert_ne!(a.storage_key("deviceId"), a.storage_key("rateLimit:x"));
    }

    #[tokio::test]
    async fn namespaced_store_hides_logical_keys() {
        let store = NamespacedStore::new(MemoryStore::new(), "loofind");
        store.set("deviceId", "abc").await.unwrap();

        assert_eq!(store.get("deviceId").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(store.inner().get("deviceId").await.unwrap(), None);
        let hashed = store.storage_key("deviceId");
        assert_eq!(
            store.inner().get(&hashed).await.unwrap().as_deref(),
            Some("abc")
        );

        store.remove("deviceId").await.unwrap();
        assert!(store.inner().is_empty().await);
    }
}

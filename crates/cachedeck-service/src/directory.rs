//! Directory of known cache names.
//!
//! The directory is a set kept in the backing store next to the entries. It
//! lets the listing endpoint enumerate caches without scanning the key space.
//! Updates are not transactional with entry writes, so the directory is an
//! index that can drift from the entries, not a source of truth.

use crate::store::KeyValueStore;
use cachedeck_core::{CacheDeckResult, CacheName};
use std::sync::Arc;
use tracing::{debug, warn};

/// Set of cache names stored under one well-known key.
#[derive(Clone)]
pub struct CacheDirectory {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CacheDirectory {
    /// Creates a directory stored under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the store key holding the set.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns every known cache name, in no particular order.
    pub async fn list(&self) -> CacheDeckResult<Vec<CacheName>> {
        let members = self.store.set_members(&self.key).await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match CacheName::new(member) {
                Ok(name) => Some(name),
                Err(e) => {
                    warn!(directory = %self.key, "Skipping invalid directory member: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Adds `name`; returns `true` if it was not known before.
    pub async fn record(&self, name: &CacheName) -> CacheDeckResult<bool> {
        let added = self.store.set_add(&self.key, name.as_str()).await?;
        if added {
            debug!(cache = %name, "Recorded cache in directory");
        }
        Ok(added)
    }

    /// Removes `name`; returns `true` if it was known.
    pub async fn forget(&self, name: &CacheName) -> CacheDeckResult<bool> {
        let removed = self.store.set_remove(&self.key, name.as_str()).await?;
        if removed {
            debug!(cache = %name, "Removed cache from directory");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, MockKeyValueStore};
    use cachedeck_core::CacheDeckError;

    fn name(value: &str) -> CacheName {
        CacheName::new(value).unwrap()
    }

    fn directory() -> CacheDirectory {
        CacheDirectory::new(Arc::new(InMemoryStore::new()), "test:cacheNames")
    }

    #[tokio::test]
    async fn test_record_then_list() {
        let directory = directory();
        assert!(directory.list().await.unwrap().is_empty());

        assert!(directory.record(&name("orders")).await.unwrap());
        assert_eq!(directory.list().await.unwrap(), vec![name("orders")]);
    }

    #[tokio::test]
    async fn test_record_is_idempotent() {
        let directory = directory();
        assert!(directory.record(&name("orders")).await.unwrap());
        assert!(!directory.record(&name("orders")).await.unwrap());
        assert_eq!(directory.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_forget() {
        let directory = directory();
        directory.record(&name("orders")).await.unwrap();
        directory.record(&name("users")).await.unwrap();

        assert!(directory.forget(&name("orders")).await.unwrap());
        assert!(!directory.forget(&name("orders")).await.unwrap());
        assert_eq!(directory.list().await.unwrap(), vec![name("users")]);
    }

    #[tokio::test]
    async fn test_concurrent_record_and_forget() {
        let directory = directory();
        let names: Vec<CacheName> = (0..64).map(|i| name(&format!("cache-{i}"))).collect();

        let mut handles = Vec::new();
        for cache_name in names.clone() {
            let directory = directory.clone();
            handles.push(tokio::spawn(async move {
                directory.record(&cache_name).await.unwrap();
                directory.record(&cache_name).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(directory.list().await.unwrap().len(), names.len());

        let mut handles = Vec::new();
        for cache_name in names.iter().step_by(2).cloned() {
            let directory = directory.clone();
            handles.push(tokio::spawn(async move {
                directory.forget(&cache_name).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(directory.list().await.unwrap().len(), names.len() / 2);
    }

    #[tokio::test]
    async fn test_invalid_members_skipped() {
        let store = Arc::new(InMemoryStore::new());
        store.set_add("names", "").await.unwrap();
        store.set_add("names", "orders").await.unwrap();

        let directory = CacheDirectory::new(store, "names");
        assert_eq!(directory.list().await.unwrap(), vec![name("orders")]);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_members()
            .returning(|_| Err(CacheDeckError::cache("connection reset")));

        let directory = CacheDirectory::new(Arc::new(store), "names");
        let err = directory.list().await.unwrap_err();
        assert!(err.is_store_failure());
    }
}

//! Cache query service trait definition.

use async_trait::async_trait;
use cachedeck_core::{CacheDeckResult, CacheName};
use serde_json::Value;

/// Cache access service behind the HTTP surface.
///
/// Cache names arrive as raw path segments and are validated here.
#[async_trait]
pub trait CacheQueryService: Send + Sync {
    /// Lists every cache name recorded in the directory, sorted.
    async fn list_caches(&self) -> CacheDeckResult<Vec<CacheName>>;

    /// Resolves a cache; returns its name, or `None` when it cannot be resolved.
    async fn lookup_cache(&self, cache_name: &str) -> CacheDeckResult<Option<CacheName>>;

    /// Gets an entry; `None` when the cache or the key is absent.
    async fn get_entry(&self, cache_name: &str, key: &str) -> CacheDeckResult<Option<Value>>;

    /// Stores an entry, replacing any previous value.
    async fn put_entry(&self, cache_name: &str, key: &str, value: Value) -> CacheDeckResult<()>;

    /// Clears every entry of a cache and removes it from the directory.
    async fn delete_cache(&self, cache_name: &str) -> CacheDeckResult<()>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> CacheDeckResult<()>;

    /// Short name of the backing store.
    fn backend(&self) -> &'static str;
}

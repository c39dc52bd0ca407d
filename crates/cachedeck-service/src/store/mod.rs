//! Backing store abstraction.
//!
//! Entries are opaque byte strings addressed by byte keys; the cache
//! directory is a set of strings. Both live in the same store.

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryStore;
pub use redis_store::{create_pool, RedisStore};

use cachedeck_core::CacheDeckResult;
use async_trait::async_trait;
use std::time::Duration;

/// Key/value and set operations the cache layer needs from its store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short name of the backend, for logs and health output.
    fn backend(&self) -> &'static str;

    /// Checks that the store is reachable.
    async fn ping(&self) -> CacheDeckResult<()>;

    /// Gets the value stored at `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &[u8]) -> CacheDeckResult<Option<Vec<u8>>>;

    /// Stores `value` at `key`, expiring after `ttl` when given.
    async fn set(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> CacheDeckResult<()>;

    /// Deletes every key starting with `prefix`.
    ///
    /// Returns the number of keys deleted.
    async fn delete_prefix(&self, prefix: &[u8]) -> CacheDeckResult<u64>;

    /// Adds `member` to the set at `key`; returns `true` if it was new.
    async fn set_add(&self, key: &str, member: &str) -> CacheDeckResult<bool>;

    /// Removes `member` from the set at `key`; returns `true` if it was present.
    async fn set_remove(&self, key: &str, member: &str) -> CacheDeckResult<bool>;

    /// Returns all members of the set at `key`.
    async fn set_members(&self, key: &str) -> CacheDeckResult<Vec<String>>;
}

/// Builds a glob pattern matching every key that starts with `prefix`.
///
/// Glob metacharacters inside the prefix are escaped so that a cache name
/// like `a*` only matches its own keys.
#[must_use]
pub fn prefix_pattern(prefix: &[u8]) -> Vec<u8> {
    let mut pattern = Vec::with_capacity(prefix.len() + 1);
    for &byte in prefix {
        if matches!(byte, b'*' | b'?' | b'[' | b']' | b'\\') {
            pattern.push(b'\\');
        }
        pattern.push(byte);
    }
    pattern.push(b'*');
    pattern
}

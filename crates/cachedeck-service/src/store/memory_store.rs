//! In-process store, used when Redis is disabled and in tests.

use super::KeyValueStore;
use async_trait::async_trait;
use cachedeck_core::CacheDeckResult;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Store keeping entries and sets in process memory.
///
/// Expired entries are dropped lazily when touched.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<Vec<u8>, StoredValue>>,
    sets: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|v| v.is_live(now)).count()
    }

    /// Returns true if no live entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> CacheDeckResult<()> {
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> CacheDeckResult<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(stored) if stored.is_live(now) => return Ok(Some(stored.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.entries.write().retain(|_, stored| stored.is_live(now));
        Ok(None)
    }

    async fn set(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> CacheDeckResult<()> {
        let stored = StoredValue {
            value: value.to_vec(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().insert(key.to_vec(), stored);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &[u8]) -> CacheDeckResult<u64> {
        let now = Instant::now();
        let mut deleted = 0u64;
        self.entries.write().retain(|key, stored| {
            if key.starts_with(prefix) {
                if stored.is_live(now) {
                    deleted += 1;
                }
                false
            } else {
                true
            }
        });
        Ok(deleted)
    }

    async fn set_add(&self, key: &str, member: &str) -> CacheDeckResult<bool> {
        Ok(self
            .sets
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> CacheDeckResult<bool> {
        let mut sets = self.sets.write();
        let Some(members) = sets.get_mut(key) else {
            return Ok(false);
        };
        let removed = members.remove(member);
        if members.is_empty() {
            sets.remove(key);
        }
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> CacheDeckResult<Vec<String>> {
        Ok(self
            .sets
            .read()
            .get(key)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }
}

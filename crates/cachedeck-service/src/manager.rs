//! Cache manager and named cache handles.

use crate::codec::ValueCodec;
use crate::directory::CacheDirectory;
use crate::prefix::CachePrefix;
use crate::store::KeyValueStore;
use cachedeck_config::CacheConfig;
use cachedeck_core::{CacheDeckResult, CacheName};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Settings for a [`CacheManager`].
#[derive(Debug, Clone, Default)]
pub struct CacheManagerSettings {
    /// Create handles for unknown names on demand.
    pub dynamic: bool,
    /// Names resolved when the manager is created.
    pub initial_names: Vec<CacheName>,
    /// Expiration applied when a cache has no override.
    pub default_expiration: Option<Duration>,
    /// Per-cache expiration overrides.
    pub expires: HashMap<CacheName, Option<Duration>>,
}

impl CacheManagerSettings {
    /// Builds settings from the cache configuration.
    pub fn from_config(config: &CacheConfig) -> CacheDeckResult<Self> {
        let initial_names = config
            .cache_names
            .iter()
            .map(|name| CacheName::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let expires = config
            .expirations()
            .into_iter()
            .map(|(name, ttl)| CacheName::new(name).map(|name| (name, ttl)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            dynamic: config.dynamic,
            initial_names,
            default_expiration: config.default_expiration(),
            expires,
        })
    }
}

/// Handle to one logical cache.
///
/// Entries live at `prefix + key` in the shared store.
pub struct NamedCache {
    name: CacheName,
    prefix: Vec<u8>,
    expiration: Option<Duration>,
    store: Arc<dyn KeyValueStore>,
    codec: ValueCodec,
}

impl NamedCache {
    /// Returns the cache name.
    #[must_use]
    pub fn name(&self) -> &CacheName {
        &self.name
    }

    /// Returns the key prefix shared by all entries of this cache.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the expiration applied to writes, if any.
    #[must_use]
    pub const fn expiration(&self) -> Option<Duration> {
        self.expiration
    }

    /// Returns the physical store key of `key`.
    #[must_use]
    pub fn entry_key(&self, key: &str) -> Vec<u8> {
        let mut entry_key = Vec::with_capacity(self.prefix.len() + key.len());
        entry_key.extend_from_slice(&self.prefix);
        entry_key.extend_from_slice(key.as_bytes());
        entry_key
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> CacheDeckResult<Option<Value>> {
        match self.store.get(&self.entry_key(key)).await? {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &Value) -> CacheDeckResult<()> {
        let bytes = self.codec.encode(value)?;
        self.store
            .set(&self.entry_key(key), &bytes, self.expiration)
            .await
    }

    /// Removes every entry of this cache; returns how many were removed.
    pub async fn clear(&self) -> CacheDeckResult<u64> {
        let removed = self.store.delete_prefix(&self.prefix).await?;
        info!(cache = %self.name, removed, "Cleared cache");
        Ok(removed)
    }
}

impl fmt::Debug for NamedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedCache")
            .field("name", &self.name)
            .field("prefix", &String::from_utf8_lossy(&self.prefix))
            .field("expiration", &self.expiration)
            .field("backend", &self.store.backend())
            .finish_non_exhaustive()
    }
}

/// Resolves cache names to [`NamedCache`] handles.
pub struct CacheManager {
    store: Arc<dyn KeyValueStore>,
    prefix: Arc<dyn CachePrefix>,
    codec: ValueCodec,
    dynamic: bool,
    default_expiration: Option<Duration>,
    expires: RwLock<HashMap<CacheName, Option<Duration>>>,
    caches: RwLock<HashMap<CacheName, Arc<NamedCache>>>,
}

impl CacheManager {
    /// Creates a manager and resolves the configured initial names.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        prefix: Arc<dyn CachePrefix>,
        codec: ValueCodec,
        settings: CacheManagerSettings,
    ) -> Self {
        let manager = Self {
            store,
            prefix,
            codec,
            dynamic: settings.dynamic,
            default_expiration: settings.default_expiration,
            expires: RwLock::new(settings.expires),
            caches: RwLock::new(HashMap::new()),
        };

        for name in settings.initial_names {
            manager.resolve(name);
        }

        manager
    }

    /// Returns the handle for `name`, creating it in dynamic mode.
    #[must_use]
    pub fn get_cache(&self, name: &CacheName) -> Option<Arc<NamedCache>> {
        if let Some(cache) = self.caches.read().get(name) {
            return Some(Arc::clone(cache));
        }

        if !self.dynamic {
            debug!(cache = %name, "Cache is not configured");
            return None;
        }

        Some(self.resolve(name.clone()))
    }

    /// Names of every cache resolved by this manager, sorted.
    #[must_use]
    pub fn cache_names(&self) -> Vec<CacheName> {
        let mut names: Vec<CacheName> = self.caches.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Expiration applied to writes into `name`.
    #[must_use]
    pub fn expiration_for(&self, name: &CacheName) -> Option<Duration> {
        self.expires
            .read()
            .get(name)
            .copied()
            .unwrap_or(self.default_expiration)
    }

    /// Sets the expiration of handles for `name` resolved after this call.
    ///
    /// A handle that is already resolved keeps the expiration it was built
    /// with, so writes through it are unaffected.
    pub fn set_expiration(&self, name: &CacheName, expiration: Option<Duration>) {
        self.expires.write().insert(name.clone(), expiration);
        debug!(cache = %name, ?expiration, "Updated expiration for new handles");
    }

    /// Resolves every name recorded in `directory`; returns how many were new.
    pub async fn load_remote_caches(&self, directory: &CacheDirectory) -> CacheDeckResult<usize> {
        let names = directory.list().await?;

        let mut loaded = 0;
        for name in names {
            if !self.caches.read().contains_key(&name) {
                self.resolve(name);
                loaded += 1;
            }
        }

        info!(loaded, directory = directory.key(), "Loaded remote caches");
        Ok(loaded)
    }

    fn resolve(&self, name: CacheName) -> Arc<NamedCache> {
        let expiration = self.expiration_for(&name);
        let mut caches = self.caches.write();
        Arc::clone(
            caches
                .entry(name.clone())
                .or_insert_with(|| Arc::new(self.build(name, expiration))),
        )
    }

    fn build(&self, name: CacheName, expiration: Option<Duration>) -> NamedCache {
        NamedCache {
            prefix: self.prefix.prefix(&name),
            name,
            expiration,
            store: Arc::clone(&self.store),
            codec: self.codec,
        }
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("backend", &self.store.backend())
            .field("prefix", &self.prefix)
            .field("dynamic", &self.dynamic)
            .field("default_expiration", &self.default_expiration)
            .field("caches", &self.cache_names())
            .finish_non_exhaustive()
    }
}

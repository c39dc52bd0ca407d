//! Cache query service implementation.

use crate::cache_query_service::CacheQueryService;
use crate::directory::CacheDirectory;
use crate::manager::CacheManager;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use cachedeck_config::CacheConfig;
use cachedeck_core::{CacheDeckError, CacheDeckResult, CacheName};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Behavioral switches of [`CacheQueryServiceImpl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheQueryOptions {
    /// Record cache names in the directory on lookups and reads.
    pub record_on_read: bool,
    /// Reject cache names containing this delimiter.
    pub strict_delimiter: Option<String>,
    /// Expiration for handles of a deleted cache that are resolved later.
    pub delete_expiration: Option<Duration>,
}

impl Default for CacheQueryOptions {
    fn default() -> Self {
        Self {
            record_on_read: true,
            strict_delimiter: None,
            delete_expiration: Some(Duration::from_secs(1)),
        }
    }
}

impl CacheQueryOptions {
    /// Builds options from the cache configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            record_on_read: config.record_on_read,
            strict_delimiter: config.strict_names.then(|| config.delimiter.clone()),
            delete_expiration: config.delete_expiration(),
        }
    }
}

/// Cache query service over a [`CacheManager`] and a [`CacheDirectory`].
pub struct CacheQueryServiceImpl {
    store: Arc<dyn KeyValueStore>,
    manager: Arc<CacheManager>,
    directory: CacheDirectory,
    options: CacheQueryOptions,
}

impl CacheQueryServiceImpl {
    /// Creates a new cache query service.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        manager: Arc<CacheManager>,
        directory: CacheDirectory,
        options: CacheQueryOptions,
    ) -> Self {
        Self {
            store,
            manager,
            directory,
            options,
        }
    }

    fn parse_name(&self, cache_name: &str) -> CacheDeckResult<CacheName> {
        let name = CacheName::new(cache_name)?;
        if let Some(delimiter) = &self.options.strict_delimiter {
            name.ensure_excludes(delimiter)?;
        }
        Ok(name)
    }

    async fn record_read(&self, name: &CacheName) -> CacheDeckResult<()> {
        if self.options.record_on_read {
            self.directory.record(name).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheQueryService for CacheQueryServiceImpl {
    async fn list_caches(&self) -> CacheDeckResult<Vec<CacheName>> {
        debug!("Listing caches");

        let mut names = self.directory.list().await?;
        names.sort();
        Ok(names)
    }

    async fn lookup_cache(&self, cache_name: &str) -> CacheDeckResult<Option<CacheName>> {
        debug!("Looking up cache: {}", cache_name);

        let name = self.parse_name(cache_name)?;
        let Some(cache) = self.manager.get_cache(&name) else {
            return Ok(None);
        };
        self.record_read(&name).await?;

        Ok(Some(cache.name().clone()))
    }

    async fn get_entry(&self, cache_name: &str, key: &str) -> CacheDeckResult<Option<Value>> {
        debug!("Getting entry '{}' from cache: {}", key, cache_name);

        let name = self.parse_name(cache_name)?;
        let Some(cache) = self.manager.get_cache(&name) else {
            return Ok(None);
        };

        // Only a hit records, so a deleted cache stays out of the directory
        let value = cache.get(key).await?;
        if value.is_some() {
            self.record_read(&name).await?;
        }
        Ok(value)
    }

    async fn put_entry(&self, cache_name: &str, key: &str, value: Value) -> CacheDeckResult<()> {
        debug!("Putting entry '{}' into cache: {}", key, cache_name);

        let name = self.parse_name(cache_name)?;
        let cache = self
            .manager
            .get_cache(&name)
            .ok_or_else(|| CacheDeckError::not_found("Cache", &name))?;

        self.directory.record(&name).await?;
        cache.put(key, &value).await
    }

    async fn delete_cache(&self, cache_name: &str) -> CacheDeckResult<()> {
        debug!("Deleting cache: {}", cache_name);

        let name = self.parse_name(cache_name)?;
        match self.manager.get_cache(&name) {
            Some(cache) => {
                cache.clear().await?;
                if let Some(expiration) = self.options.delete_expiration {
                    self.manager.set_expiration(&name, Some(expiration));
                }
            }
            None => debug!("Cache '{}' is not resolvable, nothing to clear", name),
        }

        self.directory.forget(&name).await?;

        info!("Cache deleted: {}", name);
        Ok(())
    }

    async fn ping(&self) -> CacheDeckResult<()> {
        self.store.ping().await
    }

    fn backend(&self) -> &'static str {
        self.store.backend()
    }
}

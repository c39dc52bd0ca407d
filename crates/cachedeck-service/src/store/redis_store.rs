//! Redis-backed store.

use super::{prefix_pattern, KeyValueStore};
use async_trait::async_trait;
use cachedeck_config::RedisConfig;
use cachedeck_core::{CacheDeckError, CacheDeckResult};
use deadpool_redis::{
    redis::{self, AsyncCommands, RedisError},
    Config, Connection, Pool, Runtime,
};
use std::time::Duration;
use tracing::{debug, info};

/// Keys requested per SCAN round trip when clearing a prefix.
const SCAN_BATCH: usize = 500;

/// Create a Redis connection pool and check that the server answers.
pub async fn create_pool(config: &RedisConfig) -> CacheDeckResult<Pool> {
    info!("Creating Redis connection pool for {}", config.redacted_url());

    let cfg = Config::from_url(config.connection_url()?);

    let pool = cfg
        .builder()
        .map_err(|e| CacheDeckError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| CacheDeckError::Configuration(format!("Failed to create pool: {}", e)))?;

    let store = RedisStore::new(pool.clone());
    store.ping().await?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}

/// Redis store over a `deadpool-redis` pool.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Connects using `config` and returns a ready store.
    pub async fn connect(config: &RedisConfig) -> CacheDeckResult<Self> {
        Ok(Self::new(create_pool(config).await?))
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> CacheDeckResult<Connection> {
        self.pool.get().await.map_err(|e| {
            CacheDeckError::Unavailable(format!("Failed to get Redis connection: {}", e))
        })
    }
}

fn command_error(operation: &str, key: &[u8], err: &RedisError) -> CacheDeckError {
    CacheDeckError::Cache(format!(
        "Failed to {} '{}': {}",
        operation,
        String::from_utf8_lossy(key),
        err
    ))
}

#[async_trait]
impl KeyValueStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> CacheDeckResult<()> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| CacheDeckError::Unavailable(format!("Redis did not answer PING: {}", e)))?;
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> CacheDeckResult<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| command_error("get key", key, &e))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", String::from_utf8_lossy(key)),
            None => debug!("Cache miss for key '{}'", String::from_utf8_lossy(key)),
        }

        Ok(value)
    }

    async fn set(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> CacheDeckResult<()> {
        let mut conn = self.conn().await?;

        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                    .await
                    .map_err(|e| command_error("set key", key, &e))?;
                debug!("Stored key '{}' with TTL {}s", String::from_utf8_lossy(key), ttl_secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(|e| command_error("set key", key, &e))?;
                debug!("Stored key '{}'", String::from_utf8_lossy(key));
            }
        }

        Ok(())
    }

    async fn delete_prefix(&self, prefix: &[u8]) -> CacheDeckResult<u64> {
        let mut conn = self.conn().await?;
        let pattern = prefix_pattern(prefix);

        // SCAN instead of KEYS so a large cache does not block the server
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<Vec<u8>>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| command_error("scan prefix", prefix, &e))?;

            if !keys.is_empty() {
                let removed: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| command_error("delete keys under", prefix, &e))?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(
            "Deleted {} keys matching prefix '{}'",
            deleted,
            String::from_utf8_lossy(prefix)
        );
        Ok(deleted)
    }

    async fn set_add(&self, key: &str, member: &str) -> CacheDeckResult<bool> {
        let mut conn = self.conn().await?;
        let added: u64 = conn
            .sadd(key, member)
            .await
            .map_err(|e| command_error("add member to", key.as_bytes(), &e))?;
        Ok(added > 0)
    }

    async fn set_remove(&self, key: &str, member: &str) -> CacheDeckResult<bool> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn
            .srem(key, member)
            .await
            .map_err(|e| command_error("remove member from", key.as_bytes(), &e))?;
        Ok(removed > 0)
    }

    async fn set_members(&self, key: &str) -> CacheDeckResult<Vec<String>> {
        let mut conn = self.conn().await?;
        let members: Vec<String> = conn
            .smembers(key)
            .await
            .map_err(|e| command_error("read members of", key.as_bytes(), &e))?;
        Ok(members)
    }
}

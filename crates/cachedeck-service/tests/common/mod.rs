//! Common test infrastructure for Redis integration tests.

use cachedeck_config::RedisConfig;
use cachedeck_service::RedisStore;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

/// Test Redis container wrapper.
///
/// Manages a Redis testcontainer lifecycle and provides a connected store.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    store: Arc<RedisStore>,
}

impl TestRedis {
    /// Starts a fresh Redis container and connects to it.
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port,
            pool_size: 4,
            ..Default::default()
        };

        let store = Self::connect_with_retry(&config, 30).await;

        Self {
            _container: container,
            store: Arc::new(store),
        }
    }

    /// Returns the connected store.
    pub fn store(&self) -> Arc<RedisStore> {
        Arc::clone(&self.store)
    }

    async fn connect_with_retry(config: &RedisConfig, max_attempts: u32) -> RedisStore {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match RedisStore::connect(config).await {
                Ok(store) => return store,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!("Failed to connect to Redis after {} attempts: {}", max_attempts, e);
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}

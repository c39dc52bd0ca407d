//! Application builder.
//!
//! Wires the components explicitly: store, prefixer, directory, manager,
//! query service and finally the HTTP router.

use axum::Router;
use cachedeck_config::AppConfig;
use cachedeck_core::{CacheDeckError, CacheDeckResult};
use cachedeck_rest::{create_router, AppState};
use cachedeck_service::{
    CacheDirectory, CacheManager, CacheManagerSettings, CacheQueryOptions, CacheQueryServiceImpl,
    DelimitedCachePrefix, InMemoryStore, KeyValueStore, RedisStore, ValueCodec,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Application builder for constructing the server.
#[derive(Default)]
pub struct AppBuilder {
    config: Option<AppConfig>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl AppBuilder {
    /// Creates a new application builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `store` instead of the one selected by configuration.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds every component and the router.
    pub async fn build(self) -> CacheDeckResult<Application> {
        let config = self.config.unwrap_or_default();

        let store = match self.store {
            Some(store) => store,
            None => create_store(&config).await?,
        };

        let prefix = DelimitedCachePrefix::from_config(&config.cache)?;
        let directory = CacheDirectory::new(Arc::clone(&store), config.cache.directory_key.clone());
        let manager = CacheManager::new(
            Arc::clone(&store),
            Arc::new(prefix),
            ValueCodec::new(config.cache.value_format),
            CacheManagerSettings::from_config(&config.cache)?,
        );

        if config.cache.load_remote_caches_on_startup {
            manager.load_remote_caches(&directory).await?;
        }

        let backend = store.backend();
        let service = CacheQueryServiceImpl::new(
            store,
            Arc::new(manager),
            directory,
            CacheQueryOptions::from_config(&config.cache),
        );

        let router = create_router(AppState::new(Arc::new(service)), &config.server);

        Ok(Application {
            config,
            backend,
            router,
        })
    }
}

async fn create_store(config: &AppConfig) -> CacheDeckResult<Arc<dyn KeyValueStore>> {
    if config.redis.enabled {
        Ok(Arc::new(RedisStore::connect(&config.redis).await?))
    } else {
        warn!("Redis is disabled, entries are kept in process memory");
        Ok(Arc::new(InMemoryStore::new()))
    }
}

/// A fully wired application, ready to serve.
pub struct Application {
    config: AppConfig,
    backend: &'static str,
    router: Router,
}

impl Application {
    /// Returns the configuration the application was built with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the name of the backing store.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Returns the HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the listener and serves until a shutdown signal arrives.
    pub async fn run(self) -> CacheDeckResult<()> {
        let addr = self.config.server.addr();
        info!("Starting REST server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| CacheDeckError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CacheDeckError::Internal(format!("REST server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

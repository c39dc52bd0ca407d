//! # CacheDeck Server
//!
//! Main entry point for the CacheDeck application.

use cachedeck_config::{AppConfig, ConfigLoader};
use cachedeck_core::{init_telemetry, CacheDeckError, CacheDeckResult};
use cachedeck_server::{startup, AppBuilder};
use tracing::{error, info};

fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.observability) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    startup::print_banner();
    info!("Starting CacheDeck Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config) {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: AppConfig) -> CacheDeckResult<()> {
    let worker_threads = config.server.worker_threads();
    info!("Worker threads: {}", worker_threads);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_name("cachedeck-worker")
        .enable_all()
        .build()
        .map_err(|e| CacheDeckError::Internal(format!("Failed to build runtime: {}", e)))?;

    runtime.block_on(async {
        let app = AppBuilder::new().with_config(config).build().await?;
        startup::print_startup_info(app.config(), app.backend());
        app.run().await
    })
}

//! Server startup utilities.

use cachedeck_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ______           __         ____            __
  / ____/___ ______/ /_  ___  / __ \___  _____/ /__
 / /   / __ `/ ___/ __ \/ _ \/ / / / _ \/ ___/ //_/
/ /___/ /_/ / /__/ / / /  __/ /_/ /  __/ /__/ ,<
\____/\__,_/\___/_/ /_/\___/_____/\___/\___/_/|_|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig, backend: &str) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("REST API:  http://{}/cache", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("Store:     {}", backend);
    info!(
        "Namespace: {}{}<cache>{}",
        config.cache.extra_prefix, config.cache.delimiter, config.cache.delimiter
    );
    info!("Directory: {}", config.cache.directory_key);
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default(), "memory");
    }
}

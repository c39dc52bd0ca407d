//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use cachedeck_core::{CacheDeckError, CacheDeckResult};
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use tracing::{debug, info};

/// Prefix of environment variables overriding file configuration.
pub const ENV_PREFIX: &str = "CACHEDECK";

/// Loads the application configuration once, at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `default.toml` - Default values
    /// 2. `{environment}.toml` - Environment-specific overrides
    /// 3. `local.toml` - Local overrides (not committed)
    /// 4. Environment variables such as `CACHEDECK__REDIS__HOST`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> CacheDeckResult<AppConfig> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for layer in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", layer));
            if path.exists() {
                debug!("Loading config layer from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cache.cache_names")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_cachedeck_error)?;

        app_config.app.environment = environment;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            CacheDeckError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

fn config_error_to_cachedeck_error(err: ConfigError) -> CacheDeckError {
    CacheDeckError::Configuration(err.to_string())
}

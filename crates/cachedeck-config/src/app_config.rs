//! Application configuration structures.

use cachedeck_core::{CacheDeckError, CacheDeckResult, TelemetryConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Redis connection configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache namespacing and expiration configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: TelemetryConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "cachedeck".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Upper bound on runtime worker threads serving requests.
    pub max_worker_threads: usize,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_worker_threads: 20,
            max_body_size: 1024 * 1024, // 1MB
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the HTTP bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Number of worker threads to start, never more than the host offers.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        let available = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        self.max_worker_threads.clamp(1, available.max(1))
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis host.
    pub host: String,
    /// Redis port.
    pub port: u16,
    /// Redis password; empty means no authentication.
    pub password: String,
    /// Logical database index.
    pub database: u32,
    /// Connection pool size.
    pub pool_size: usize,
    /// Use Redis; when disabled an in-process store is used instead.
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: String::new(),
            database: 0,
            pool_size: 10,
            enabled: true,
        }
    }
}

impl RedisConfig {
    /// Builds the `redis://` connection URL, percent-encoding the password.
    pub fn connection_url(&self) -> CacheDeckResult<String> {
        let mut url = Url::parse(&format!("redis://{}:{}/{}", self.host, self.port, self.database))
            .map_err(|e| CacheDeckError::Configuration(format!("Invalid Redis address: {}", e)))?;

        if !self.password.is_empty() {
            url.set_password(Some(&self.password)).map_err(|()| {
                CacheDeckError::configuration("Redis password cannot be set on this URL")
            })?;
        }

        Ok(url.to_string())
    }

    /// Connection URL with the password masked, for logging.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let auth = if self.password.is_empty() { "" } else { ":***@" };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.database)
    }
}

/// Encoding of values written to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// JSON text of the value.
    #[default]
    Json,
    /// Raw UTF-8 text; strings are written verbatim.
    String,
}

/// Cache namespacing, directory and expiration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Delimiter placed between prefix segments.
    pub delimiter: String,
    /// Leading segment of every entry key.
    pub extra_prefix: String,
    /// Key of the set holding known cache names.
    pub directory_key: String,
    /// Create caches on first use.
    pub dynamic: bool,
    /// Caches that always resolve, even when `dynamic` is off.
    pub cache_names: Vec<String>,
    /// Entry expiration in seconds; 0 means entries never expire.
    pub default_expiration_secs: u64,
    /// Per-cache expiration overrides in seconds.
    pub expires: HashMap<String, u64>,
    /// Expiration for handles of a deleted cache resolved later; 0 disables.
    pub delete_expiration_secs: u64,
    /// Resolve every name found in the directory at startup.
    pub load_remote_caches_on_startup: bool,
    /// Record the cache name in the directory on read paths too.
    pub record_on_read: bool,
    /// Reject cache names that contain the delimiter.
    pub strict_names: bool,
    /// Encoding of stored values.
    pub value_format: ValueFormat,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            delimiter: ":".to_string(),
            extra_prefix: "cache".to_string(),
            directory_key: "cachedeck:cacheNames".to_string(),
            dynamic: true,
            cache_names: Vec::new(),
            default_expiration_secs: 0,
            expires: HashMap::new(),
            delete_expiration_secs: 1,
            load_remote_caches_on_startup: true,
            record_on_read: true,
            strict_names: false,
            value_format: ValueFormat::Json,
        }
    }
}

impl CacheConfig {
    /// Returns the default entry expiration, `None` when entries never expire.
    #[must_use]
    pub const fn default_expiration(&self) -> Option<Duration> {
        secs_to_ttl(self.default_expiration_secs)
    }

    /// Returns the expiration registered for deleted caches.
    #[must_use]
    pub const fn delete_expiration(&self) -> Option<Duration> {
        secs_to_ttl(self.delete_expiration_secs)
    }

    /// Returns the configured per-cache expirations.
    #[must_use]
    pub fn expirations(&self) -> HashMap<String, Option<Duration>> {
        self.expires
            .iter()
            .map(|(name, secs)| (name.clone(), secs_to_ttl(*secs)))
            .collect()
    }
}

const fn secs_to_ttl(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6379);
        assert!(config.password.is_empty());
        assert_eq!(config.connection_url().unwrap(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_redis_url_encodes_password() {
        let config = RedisConfig {
            password: "p@ss word".to_string(),
            ..RedisConfig::default()
        };
        let url = config.connection_url().unwrap();
        assert_eq!(url, "redis://:p%40ss%20word@localhost:6379/0");
        assert_eq!(config.redacted_url(), "redis://:***@localhost:6379/0");
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.max_worker_threads, 20);
        assert!(config.worker_threads() >= 1);
        assert!(config.worker_threads() <= 20);
    }

    #[test]
    fn test_cache_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.delimiter, ":");
        assert_eq!(config.extra_prefix, "cache");
        assert!(config.dynamic);
        assert_eq!(config.default_expiration(), None);
        assert_eq!(config.delete_expiration(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_expirations() {
        let mut config = CacheConfig::default();
        config.expires.insert("sessions".to_string(), 60);
        config.expires.insert("forever".to_string(), 0);

        let expirations = config.expirations();
        assert_eq!(expirations["sessions"], Some(Duration::from_secs(60)));
        assert_eq!(expirations["forever"], None);
    }

    #[test]
    fn test_value_format_deserialize() {
        let format: ValueFormat = serde_json::from_str("\"string\"").unwrap();
        assert_eq!(format, ValueFormat::String);
    }
}

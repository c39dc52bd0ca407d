//! Configuration validation module.
//!
//! Provides validation for all configuration values, failing fast on
//! invalid configuration rather than at runtime.

use crate::{AppConfig, CacheConfig, RedisConfig, ServerConfig};
use cachedeck_core::{CacheName, TelemetryConfig};
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A required value is missing (empty).
    MissingValue { name: String },
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Worker thread count is out of range.
    InvalidWorkerThreads { value: usize, maximum: usize },
    /// Pool size must be at least one.
    InvalidPoolSize { value: usize },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: usize, maximum: usize },
    /// Size limit must be positive.
    NonPositiveLimit { name: String },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// A configured cache name is invalid.
    InvalidCacheName { name: String, message: String },
    /// The directory key lives inside the entry namespace.
    DirectoryKeyInNamespace { key: String, prefix: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { name } => write!(f, "'{}' is required", name),
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidWorkerThreads { value, maximum } => {
                write!(
                    f,
                    "Invalid worker thread count: {} (must be between 1 and {})",
                    value, maximum
                )
            }
            Self::InvalidPoolSize { value } => {
                write!(f, "Invalid pool size: {} (must be at least 1)", value)
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::NonPositiveLimit { name } => write!(f, "'{}' must be positive", name),
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidCacheName { name, message } => {
                write!(f, "Invalid cache name '{}': {}", name, message)
            }
            Self::DirectoryKeyInNamespace { key, prefix } => {
                write!(
                    f,
                    "Directory key '{}' must not start with the entry prefix '{}'",
                    key, prefix
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum runtime worker threads.
    const MAX_WORKER_THREADS: usize = 1024;
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }

        if config.max_worker_threads == 0 || config.max_worker_threads > Self::MAX_WORKER_THREADS {
            errors.push(ConfigValidationError::InvalidWorkerThreads {
                value: config.max_worker_threads,
                maximum: Self::MAX_WORKER_THREADS,
            });
        }

        if config.max_body_size == 0 {
            errors.push(ConfigValidationError::NonPositiveLimit {
                name: "server.max_body_size".to_string(),
            });
        }
    }

    fn validate_redis(config: &RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        // A disabled store never connects, nothing else to check
        if !config.enabled {
            return;
        }

        if config.host.is_empty() {
            errors.push(ConfigValidationError::MissingValue {
                name: "redis.host".to_string(),
            });
        }

        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "redis.port".to_string(),
                value: config.port,
            });
        }

        if config.pool_size == 0 {
            errors.push(ConfigValidationError::InvalidPoolSize {
                value: config.pool_size,
            });
        } else if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if !config.host.is_empty() {
            if let Err(e) = config.connection_url() {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "Redis".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn validate_cache(config: &CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.delimiter.is_empty() {
            errors.push(ConfigValidationError::MissingValue {
                name: "cache.delimiter".to_string(),
            });
        }

        if config.extra_prefix.is_empty() {
            errors.push(ConfigValidationError::MissingValue {
                name: "cache.extra_prefix".to_string(),
            });
        }

        if config.directory_key.is_empty() {
            errors.push(ConfigValidationError::MissingValue {
                name: "cache.directory_key".to_string(),
            });
        } else if !config.delimiter.is_empty() && !config.extra_prefix.is_empty() {
            // Clearing a cache scans its prefix; the directory must never match one
            let namespace = format!("{}{}", config.extra_prefix, config.delimiter);
            if config.directory_key.starts_with(&namespace) {
                errors.push(ConfigValidationError::DirectoryKeyInNamespace {
                    key: config.directory_key.clone(),
                    prefix: namespace,
                });
            }
        }

        for name in config.cache_names.iter().chain(config.expires.keys()) {
            let checked = CacheName::new(name.as_str()).and_then(|cache_name| {
                if config.strict_names {
                    cache_name.ensure_excludes(&config.delimiter)
                } else {
                    Ok(())
                }
            });

            if let Err(e) = checked {
                errors.push(ConfigValidationError::InvalidCacheName {
                    name: name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn validate_observability(config: &TelemetryConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_namespacing_parameters() {
        let mut config = AppConfig::default();
        config.cache.delimiter = String::new();
        config.cache.extra_prefix = String::new();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(errors.contains(&ConfigValidationError::MissingValue {
            name: "cache.delimiter".to_string()
        }));
        assert!(errors.contains(&ConfigValidationError::MissingValue {
            name: "cache.extra_prefix".to_string()
        }));
    }

    #[test]
    fn test_directory_key_inside_namespace() {
        let mut config = AppConfig::default();
        config.cache.directory_key = "cache:myapp:cacheNames".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigValidationError::DirectoryKeyInNamespace {
                key: "cache:myapp:cacheNames".to_string(),
                prefix: "cache:".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_ports_and_threads() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.server.max_worker_threads = 0;
        config.redis.port = 0;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_pool_size_limits() {
        let mut config = AppConfig::default();
        config.redis.pool_size = 0;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::InvalidPoolSize { value: 0 }]);

        config.redis.pool_size = 5000;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigValidationError::PoolSizeTooLarge { .. }));
    }

    #[test]
    fn test_disabled_redis_skips_connection_checks() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config.redis.host = String::new();
        config.redis.port = 0;

        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_strict_names_rejects_delimiter() {
        let mut config = AppConfig::default();
        config.cache.cache_names = vec!["orders".to_string(), "orders:eu".to_string()];
        assert!(ConfigValidator::validate(&config).is_ok());

        config.cache.strict_names = true;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("orders:eu"));
    }

    #[test]
    fn test_empty_cache_name_rejected() {
        let mut config = AppConfig::default();
        config.cache.expires.insert(String::new(), 30);

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigValidationError::InvalidCacheName { .. }));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigValidationError::InvalidLogLevel {
                value: "verbose".to_string()
            }]
        );
    }
}

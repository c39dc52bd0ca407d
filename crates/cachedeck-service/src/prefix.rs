//! Namespacing of cache keys.
//!
//! Every entry of a cache is stored under `prefix(cache_name) + key`, so
//! caches sharing one key space never collide.

use cachedeck_config::CacheConfig;
use cachedeck_core::{CacheDeckError, CacheDeckResult, CacheName};
use std::fmt::Debug;

/// Derives the storage key prefix of a cache.
pub trait CachePrefix: Debug + Send + Sync {
    /// Returns the bytes prepended to every key stored under `cache_name`.
    fn prefix(&self, cache_name: &CacheName) -> Vec<u8>;
}

/// `extra_prefix + delimiter + cache_name + delimiter`, UTF-8 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedCachePrefix {
    delimiter: String,
    extra_prefix: String,
}

impl DelimitedCachePrefix {
    /// Default delimiter between segments.
    pub const DEFAULT_DELIMITER: &'static str = ":";

    /// Default leading segment.
    pub const DEFAULT_EXTRA_PREFIX: &'static str = "cache";

    /// Creates a prefixer; both parts are required.
    pub fn new(
        delimiter: impl Into<String>,
        extra_prefix: impl Into<String>,
    ) -> CacheDeckResult<Self> {
        let delimiter = delimiter.into();
        let extra_prefix = extra_prefix.into();

        if delimiter.is_empty() || extra_prefix.is_empty() {
            return Err(CacheDeckError::configuration("Delimiter and prefix required"));
        }

        Ok(Self {
            delimiter,
            extra_prefix,
        })
    }

    /// Creates a prefixer from the cache configuration.
    pub fn from_config(config: &CacheConfig) -> CacheDeckResult<Self> {
        Self::new(config.delimiter.as_str(), config.extra_prefix.as_str())
    }

    /// Recovers the cache name from a prefix produced by this prefixer.
    #[must_use]
    pub fn cache_name_of(&self, prefix: &[u8]) -> Option<CacheName> {
        let text = std::str::from_utf8(prefix).ok()?;
        let name = text
            .strip_prefix(self.extra_prefix.as_str())?
            .strip_prefix(self.delimiter.as_str())?
            .strip_suffix(self.delimiter.as_str())?;
        CacheName::new(name).ok()
    }
}

impl Default for DelimitedCachePrefix {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER.to_string(),
            extra_prefix: Self::DEFAULT_EXTRA_PREFIX.to_string(),
        }
    }
}

impl CachePrefix for DelimitedCachePrefix {
    fn prefix(&self, cache_name: &CacheName) -> Vec<u8> {
        let name = cache_name.as_str();
        let mut prefix = String::with_capacity(
            self.extra_prefix.len() + 2 * self.delimiter.len() + name.len(),
        );
        prefix.push_str(&self.extra_prefix);
        prefix.push_str(&self.delimiter);
        prefix.push_str(name);
        prefix.push_str(&self.delimiter);
        prefix.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn name(value: &str) -> CacheName {
        CacheName::new(value).unwrap()
    }

    #[test]
    fn test_default_prefix() {
        let prefixer = DelimitedCachePrefix::default();
        assert_eq!(prefixer.prefix(&name("orders")), b"cache:orders:".to_vec());
    }

    #[test]
    fn test_custom_prefix() {
        let prefixer = DelimitedCachePrefix::new("|", "app").unwrap();
        assert_eq!(prefixer.prefix(&name("orders")), b"app|orders|".to_vec());
    }

    #[test]
    fn test_missing_parts_rejected() {
        let err = DelimitedCachePrefix::new("", "cache").unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(DelimitedCachePrefix::new(":", "").is_err());
    }

    #[test]
    fn test_from_config() {
        let config = CacheConfig::default();
        let prefixer = DelimitedCachePrefix::from_config(&config).unwrap();
        assert_eq!(prefixer, DelimitedCachePrefix::default());
    }

    #[test]
    fn test_distinct_names_distinct_prefixes() {
        let prefixer = DelimitedCachePrefix::default();
        let names = [
            "a", "b", "ab", "a:b", "a:", ":a", "A", "orders", "orders ", "ordérs", "注文",
        ];

        let prefixes: HashSet<Vec<u8>> = names.iter().map(|n| prefixer.prefix(&name(n))).collect();
        assert_eq!(prefixes.len(), names.len());
    }

    #[test]
    fn test_round_trip() {
        let prefixer = DelimitedCachePrefix::new("::", "svc").unwrap();
        for value in ["orders", "a::b", "ordérs", " spaced "] {
            let cache_name = name(value);
            let prefix = prefixer.prefix(&cache_name);
            assert!(prefix.starts_with(b"svc::"));
            assert!(prefix.ends_with(b"::"));
            assert_eq!(prefixer.cache_name_of(&prefix), Some(cache_name));
        }
    }

    #[test]
    fn test_cache_name_of_foreign_prefix() {
        let prefixer = DelimitedCachePrefix::default();
        assert_eq!(prefixer.cache_name_of(b"other:orders:"), None);
        assert_eq!(prefixer.cache_name_of(b"cache::"), None);
        assert_eq!(prefixer.cache_name_of(&[0xff, 0xfe]), None);
    }
}

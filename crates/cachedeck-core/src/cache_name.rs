//! Cache name value object.

use crate::CacheDeckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for cache name validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheNameError {
    #[error("Cache name must not be empty")]
    Empty,

    #[error("Cache name '{name}' must not contain the delimiter '{delimiter}'")]
    ContainsDelimiter { name: String, delimiter: String },
}

impl From<CacheNameError> for CacheDeckError {
    fn from(err: CacheNameError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Identifier of a logical cache region.
///
/// The name is kept verbatim: it is part of every physical key stored for
/// the cache, so no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheName(String);

impl CacheName {
    /// Creates a new cache name, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, CacheNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CacheNameError::Empty);
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fails if the name contains `delimiter`.
    ///
    /// A name containing the delimiter can produce a namespace prefix that is
    /// itself a prefix of another cache's namespace.
    pub fn ensure_excludes(&self, delimiter: &str) -> Result<(), CacheNameError> {
        if !delimiter.is_empty() && self.0.contains(delimiter) {
            return Err(CacheNameError::ContainsDelimiter {
                name: self.0.clone(),
                delimiter: delimiter.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CacheName {
    type Error = CacheNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheName> for String {
    fn from(name: CacheName) -> Self {
        name.0
    }
}

impl AsRef<str> for CacheName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Result type aliases for CacheDeck.

use crate::CacheDeckError;

/// A specialized `Result` type for CacheDeck operations.
pub type CacheDeckResult<T> = Result<T, CacheDeckError>;

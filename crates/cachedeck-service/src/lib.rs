//! # CacheDeck Service
//!
//! Cache namespacing, the cache directory and the cache access service.
//!
//! Composition runs bottom-up: a [`KeyValueStore`] is shared by the
//! [`CacheDirectory`] and the [`CacheManager`]; the manager derives physical
//! keys through a [`CachePrefix`]; [`CacheQueryServiceImpl`] ties both
//! together behind the [`CacheQueryService`] trait used by the REST layer.

pub mod cache_query_service;
pub mod codec;
pub mod directory;
pub mod r#impl;
pub mod manager;
pub mod prefix;
pub mod store;

pub use cache_query_service::*;
pub use codec::ValueCodec;
pub use directory::CacheDirectory;
pub use r#impl::*;
pub use manager::{CacheManager, CacheManagerSettings, NamedCache};
pub use prefix::{CachePrefix, DelimitedCachePrefix};
pub use store::{InMemoryStore, KeyValueStore, RedisStore};

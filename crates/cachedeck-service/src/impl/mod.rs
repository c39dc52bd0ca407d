//! Service implementations.
//!
//! Trait definitions live in the parent module (`cache_query_service.rs`).

pub mod cache_query_service_impl;

pub use cache_query_service_impl::{CacheQueryOptions, CacheQueryServiceImpl};

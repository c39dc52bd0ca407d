//! # CacheDeck Config
//!
//! Configuration management for CacheDeck.
//! Configuration is layered from TOML files and environment variables,
//! validated once at startup and then shared as an immutable value.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;

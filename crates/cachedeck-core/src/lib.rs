//! # CacheDeck Core
//!
//! Core types and error definitions for CacheDeck.
//! This crate provides the foundational abstractions shared by the
//! configuration, service, REST and server crates.

pub mod cache_name;
pub mod error;
pub mod result;
pub mod telemetry;

pub use cache_name::*;
pub use error::*;
pub use result::*;
pub use telemetry::{init_telemetry, LogFormat, TelemetryConfig};

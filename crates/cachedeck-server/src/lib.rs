//! # CacheDeck Server Library
//!
//! Composition root and startup utilities for the CacheDeck server.

pub mod app;
pub mod startup;

pub use app::{AppBuilder, Application};

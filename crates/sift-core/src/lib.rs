//! Sift Core: shared types, errors, and configuration.
//!
//! This crate provides the foundational types used across all Sift crates.
//! It has no internal Sift dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`document`]: Stored document representation and identity helpers
//! - [`config`]: Engine and store configuration

pub mod config;
pub mod document;
pub mod error;

// Re-export key types at crate root for convenience
pub use config::{
    DEFAULT_PAGE_SIZE, EngineConfig, SCROLL_BATCH_SIZE, SCROLL_LIFETIME, SiftConfig, StoreConfig,
};
pub use document::{Document, ID_FIELD, validate_index_name};
pub use error::{Error, Result};

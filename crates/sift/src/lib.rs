//! Sift search toolkit: umbrella crate.
//!
//! This crate re-exports all Sift components for convenience.
//! Use feature flags to enable specific functionality.

#![doc = include_str!("../README.md")]

pub use sift_core as core;
pub use sift_query as query;
pub use sift_store as store;

pub use sift_core::{Error, Result, SiftConfig};
pub use sift_query::{QueryBuilder, QueryDocument};
pub use sift_store::{SearchQuery, SearchStore};

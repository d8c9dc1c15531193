//! catalog-core - Core library for catalog
//!
//! This crate turns the flat category list served by the marketplace backend
//! into a nested forest, and provides diagnostics, rendering, configuration
//! and snapshot handling around it.

pub mod error;
pub mod types;
pub mod config;
pub mod hierarchy;
pub mod render;
pub mod snapshot;

pub use error::{CatalogError, Result};
pub use hierarchy::{
    build_hierarchy, build_hierarchy_from_json, build_hierarchy_from_value, CategoryNode,
};
pub use types::*;

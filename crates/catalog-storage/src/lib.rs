//! catalog-storage - Storage library for catalog
//!
//! This crate provides storage implementations for category snapshots.

mod snapshot_store;

pub use snapshot_store::FileSystemStorage;

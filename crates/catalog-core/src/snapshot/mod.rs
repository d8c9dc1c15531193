//! Category snapshot module
//!
//! A snapshot is one fetch of the flat category list, kept so that trees can
//! be rebuilt and compared without calling the category service again.
//!
//! # Example
//!
//! ```ignore
//! use catalog_core::snapshot::{SnapshotManager, SnapshotMetadata};
//!
//! let storage = FileSystemStorage::new("/tmp/catalog")?;
//! let manager = SnapshotManager::new(storage);
//!
//! let snapshot = manager.create(records, SnapshotMetadata::default())?;
//! let latest = manager.load_latest()?;
//! ```

mod manager;
mod model;
mod persistence;

pub use manager::SnapshotManager;
pub use model::{Snapshot, SnapshotInfo, SnapshotMetadata};
pub use persistence::SnapshotStorage;

#[cfg(test)]
pub use persistence::memory::MemoryStorage;

//! Snapshot manager for CRUD operations

use super::model::{Snapshot, SnapshotInfo, SnapshotMetadata};
use super::persistence::SnapshotStorage;
use crate::error::{CatalogError, Result};
use crate::types::{CategoryRecord, SnapshotId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Manager for snapshot lifecycle
pub struct SnapshotManager {
    storage: Arc<dyn SnapshotStorage>,
}

impl SnapshotManager {
    /// Create a new snapshot manager with the given storage
    pub fn new(storage: impl SnapshotStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Create a new snapshot manager with shared storage
    pub fn with_storage(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self { storage }
    }

    /// Store `records` as a new snapshot.
    ///
    /// Fails instead of overwriting when an identical snapshot (same records,
    /// same metadata, same second) is already stored.
    pub fn create(&self, records: Vec<CategoryRecord>, metadata: SnapshotMetadata) -> Result<Snapshot> {
        let snapshot = Snapshot::new(records, metadata);
        if self.storage.exists(&snapshot.id) {
            return Err(CatalogError::Validation(format!(
                "Snapshot {} already exists",
                snapshot.id
            )));
        }
        self.storage.save(&snapshot)?;
        info!(
            "Created snapshot {} with {} records",
            snapshot.id,
            snapshot.record_count()
        );
        Ok(snapshot)
    }

    /// Load a snapshot by ID
    pub fn load(&self, id: &SnapshotId) -> Result<Snapshot> {
        self.storage.load(id)
    }

    /// Load the most recent snapshot
    pub fn load_latest(&self) -> Result<Option<Snapshot>> {
        self.storage.latest()
    }

    /// List all snapshots, newest first
    pub fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut snapshots = self.storage.list()?;
        snapshots.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(snapshots)
    }

    /// Delete a snapshot
    pub fn delete(&self, id: &SnapshotId) -> Result<()> {
        self.storage.delete(id)
    }

    /// Delete snapshots taken before the given date; returns how many were removed
    pub fn clean(&self, before: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        for info in self.storage.list()? {
            if info.created_at < before {
                self.storage.delete(&info.id)?;
                debug!("Removed snapshot {}", info.id);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

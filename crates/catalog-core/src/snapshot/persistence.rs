//! Snapshot storage trait and abstractions

use super::model::{Snapshot, SnapshotInfo};
use crate::error::Result;
use crate::types::SnapshotId;

/// Trait for snapshot storage implementations
pub trait SnapshotStorage: Send + Sync {
    /// Save a snapshot
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Load a snapshot by ID
    fn load(&self, id: &SnapshotId) -> Result<Snapshot>;

    /// List all snapshots (as info)
    fn list(&self) -> Result<Vec<SnapshotInfo>>;

    /// Delete a snapshot
    fn delete(&self, id: &SnapshotId) -> Result<()>;

    /// Check if a snapshot exists
    fn exists(&self, id: &SnapshotId) -> bool;

    /// Get the most recently taken snapshot
    fn latest(&self) -> Result<Option<Snapshot>> {
        let latest = self
            .list()?
            .into_iter()
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        match latest {
            Some(info) => self.load(&info.id).map(Some),
            None => Ok(None),
        }
    }
}

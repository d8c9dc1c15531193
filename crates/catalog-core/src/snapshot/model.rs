//! Snapshot data models

use crate::hierarchy::{CategoryNode, HierarchyBuilder};
use crate::types::{CategoryRecord, SnapshotId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A stored copy of the flat category list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unique snapshot identifier
    pub id: SnapshotId,
    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,
    /// Where the records came from
    #[serde(default)]
    pub metadata: SnapshotMetadata,
    /// The flat records, in source order
    pub records: Vec<CategoryRecord>,
}

impl Snapshot {
    /// Create a snapshot of `records`.
    ///
    /// The id digest covers the metadata as well as the records, so the same
    /// file imported under two labels gets two ids.
    pub fn new(records: Vec<CategoryRecord>, metadata: SnapshotMetadata) -> Self {
        let digest_input = serde_json::to_vec(&(&metadata, &records)).unwrap_or_default();
        Self {
            id: SnapshotId::generate(&digest_input),
            created_at: Utc::now(),
            metadata,
            records,
        }
    }

    /// Build the category forest from this snapshot
    pub fn forest(&self) -> Vec<Arc<CategoryNode>> {
        HierarchyBuilder::new().build(&self.records)
    }

    /// Number of flat records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Get snapshot info summary
    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo::from(self)
    }
}

/// Provenance of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// File or endpoint the records were read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Free-form label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Lightweight summary used for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: SnapshotId,
    pub created_at: DateTime<Utc>,
    pub record_count: usize,
    pub source: Option<String>,
    pub label: Option<String>,
}

impl From<&Snapshot> for SnapshotInfo {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            created_at: snapshot.created_at,
            record_count: snapshot.records.len(),
            source: snapshot.metadata.source.clone(),
            label: snapshot.metadata.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_creation() {
        let records = vec![
            CategoryRecord::new(1),
            CategoryRecord::new(2).with_parent(1),
        ];
        let snapshot = Snapshot::new(
            records,
            SnapshotMetadata {
                source: Some("categories.json".to_string()),
                label: None,
            },
        );

        assert_eq!(snapshot.record_count(), 2);
        assert_eq!(snapshot.forest().len(), 1);

        let info = snapshot.info();
        assert_eq!(info.id, snapshot.id);
        assert_eq!(info.record_count, 2);
        assert_eq!(info.source.as_deref(), Some("categories.json"));
    }

    #[test]
    fn test_same_content_same_digest() {
        let a = Snapshot::new(vec![CategoryRecord::new(1)], SnapshotMetadata::default());
        let b = Snapshot::new(vec![CategoryRecord::new(1)], SnapshotMetadata::default());
        let digest = |s: &Snapshot| s.id.as_str()[15..].to_string();
        assert_eq!(digest(&a), digest(&b));

        let c = Snapshot::new(vec![CategoryRecord::new(2)], SnapshotMetadata::default());
        assert_ne!(digest(&a), digest(&c));
    }

    #[test]
    fn test_label_changes_digest() {
        let labelled = |label: &str| {
            Snapshot::new(
                vec![CategoryRecord::new(1)],
                SnapshotMetadata {
                    source: Some("categories.json".to_string()),
                    label: Some(label.to_string()),
                },
            )
        };
        assert_ne!(labelled("nightly").id, labelled("weekly").id);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot::new(
            vec![CategoryRecord::new("art").with_attribute("name", "Art")],
            SnapshotMetadata::default(),
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}

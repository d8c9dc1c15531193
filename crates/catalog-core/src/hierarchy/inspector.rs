//! Diagnostics over flat category data
//!
//! The builder absorbs inconsistent input without complaint. The inspector
//! reports the same anomalies so the data source can be fixed upstream.

use super::builder::HierarchyBuilder;
use super::model::{max_depth, NodeIter};
use crate::types::{CategoryId, CategoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A record whose parent does not exist in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub category_id: CategoryId,
    pub parent_id: CategoryId,
}

/// Findings about a flat category list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyReport {
    /// Number of input records
    pub records: usize,
    /// Number of nodes reachable in the built forest
    pub nodes: usize,
    /// Number of top-level nodes
    pub roots: usize,
    /// Height of the tallest tree
    pub max_depth: usize,
    /// Ids that occur more than once, in first-seen order
    pub duplicate_ids: Vec<CategoryId>,
    /// Records pointing at a parent that does not exist
    pub dangling: Vec<DanglingReference>,
    /// Records whose ancestor chain loops back on itself
    pub cyclic: Vec<CategoryId>,
    /// Records that exist but are unreachable from any root
    pub unreachable: Vec<CategoryId>,
}

impl HierarchyReport {
    /// Check if the data has no anomalies
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.dangling.is_empty()
            && self.cyclic.is_empty()
            && self.unreachable.is_empty()
    }

    /// Number of anomalies found
    pub fn issue_count(&self) -> usize {
        self.duplicate_ids.len() + self.dangling.len() + self.cyclic.len() + self.unreachable.len()
    }
}

/// Inspects flat category data for anomalies
#[derive(Debug, Default)]
pub struct HierarchyInspector;

impl HierarchyInspector {
    /// Create a new inspector
    pub fn new() -> Self {
        Self
    }

    /// Inspect `records` and report what the builder would silently absorb
    pub fn inspect(&self, records: &[CategoryRecord]) -> HierarchyReport {
        let forest = HierarchyBuilder::new().build(records);

        let mut report = HierarchyReport {
            records: records.len(),
            roots: forest.len(),
            ..Default::default()
        };

        let mut reachable = HashSet::new();
        for (_, node) in NodeIter::unique(&forest) {
            report.nodes += 1;
            reachable.insert(node.id().clone());
        }
        report.max_depth = max_depth(&forest);

        // last write wins, same as the builder
        let mut parents: HashMap<&CategoryId, Option<&CategoryId>> = HashMap::new();
        let mut seen = HashSet::new();
        let mut reported_duplicates = HashSet::new();
        for record in records {
            if !seen.insert(&record.category_id) && reported_duplicates.insert(&record.category_id) {
                report.duplicate_ids.push(record.category_id.clone());
            }
            parents.insert(&record.category_id, record.parent_id.as_ref());
        }

        for record in records {
            if let Some(parent_id) = &record.parent_id {
                if !parents.contains_key(parent_id) {
                    report.dangling.push(DanglingReference {
                        category_id: record.category_id.clone(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
        }

        let cyclic = Self::cyclic_ids(records, &parents);
        let mut reported = HashSet::new();
        for record in records {
            let id = &record.category_id;
            if !reported.insert(id) {
                continue;
            }

            if cyclic.contains(id) {
                report.cyclic.push(id.clone());
            } else if !reachable.contains(id) {
                report.unreachable.push(id.clone());
            }
        }

        report
    }

    /// Ids whose parent chain loops back to themselves.
    ///
    /// Each id is walked at most once over all starts: a walk stops at the
    /// first id visited before, and only a stop inside the current walk
    /// closes a new loop.
    fn cyclic_ids<'a>(
        records: &'a [CategoryRecord],
        parents: &HashMap<&'a CategoryId, Option<&'a CategoryId>>,
    ) -> HashSet<&'a CategoryId> {
        let mut walked_in: HashMap<&CategoryId, usize> = HashMap::new();
        let mut cyclic = HashSet::new();

        for (walk, record) in records.iter().enumerate() {
            let mut trail: Vec<&CategoryId> = Vec::new();
            let mut current = Some(&record.category_id);

            while let Some(id) = current {
                if let Some(&earlier) = walked_in.get(id) {
                    if earlier == walk {
                        if let Some(start) = trail.iter().position(|seen| *seen == id) {
                            cyclic.extend(trail[start..].iter().copied());
                        }
                    }
                    break;
                }
                walked_in.insert(id, walk);
                trail.push(id);
                current = parents.get(id).copied().flatten();
            }
        }

        cyclic
    }
}

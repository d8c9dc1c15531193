//! Index-based node storage used while linking the hierarchy

use super::model::CategoryNode;
use crate::types::{CategoryId, CategoryRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Position of a node inside a [`CategoryArena`]
pub type NodeIndex = usize;

/// Key the builder always owns; an input field of the same name is dropped
const CHILDREN_FIELD: &str = "children";

#[derive(Debug, Clone)]
struct Slot {
    record: CategoryRecord,
    children: Vec<NodeIndex>,
}

/// Visit state of a slot during materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Growable store of category nodes with parent to children edges as indices.
///
/// One slot exists per distinct `category_id`. Both the id lookup and every
/// parent's child list point at the same slot, so a child attached before its
/// own children are linked still ends up with its full subtree.
#[derive(Debug, Clone, Default)]
pub struct CategoryArena {
    slots: Vec<Slot>,
    by_id: HashMap<CategoryId, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl CategoryArena {
    /// Create an arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
            roots: Vec::new(),
        }
    }

    /// Insert a fresh node for `record`.
    ///
    /// A record whose id is already present replaces the stored fields (last
    /// write wins) and keeps its slot. A `children` field in the input is
    /// discarded; the node's children are always the linked ones.
    pub fn insert(&mut self, record: &CategoryRecord) -> NodeIndex {
        let mut record = record.clone();
        record.attributes.remove(CHILDREN_FIELD);

        let slot = Slot {
            record,
            children: Vec::new(),
        };

        if let Some(&index) = self.by_id.get(&slot.record.category_id) {
            self.slots[index] = slot;
            return index;
        }

        let index = self.slots.len();
        self.by_id.insert(slot.record.category_id.clone(), index);
        self.slots.push(slot);
        index
    }

    /// Look up the slot of a category
    pub fn index_of(&self, id: &CategoryId) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Record stored at `index`
    pub fn record(&self, index: NodeIndex) -> Option<&CategoryRecord> {
        self.slots.get(index).map(|slot| &slot.record)
    }

    /// Child slots of `index`, in attachment order
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.slots
            .get(index)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Root slots, in attachment order
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Append `index` to the root sequence
    pub fn push_root(&mut self, index: NodeIndex) {
        self.roots.push(index);
    }

    /// Append `child` to the children of `parent`
    pub fn push_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(slot) = self.slots.get_mut(parent) {
            slot.children.push(child);
        }
    }

    /// Number of distinct categories stored
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Turn the linked slots into trees, one per root entry.
    ///
    /// Every reachable slot becomes exactly one [`CategoryNode`]; a slot listed
    /// under several parents (or several times as a root) is shared through
    /// `Arc`, so the result holds at most one node per distinct id. Slots are
    /// built children first with an explicit stack, and an edge back to a
    /// slot that is still on the current path is skipped.
    pub fn materialize(&self) -> Vec<Arc<CategoryNode>> {
        let mut marks = vec![Mark::Unvisited; self.slots.len()];
        let mut built: Vec<Option<Arc<CategoryNode>>> = vec![None; self.slots.len()];

        let mut forest = Vec::with_capacity(self.roots.len());
        for &root in &self.roots {
            if marks[root] == Mark::Unvisited {
                self.build_from(root, &mut marks, &mut built);
            }
            if let Some(node) = &built[root] {
                forest.push(Arc::clone(node));
            }
        }
        forest
    }

    /// Depth-first post-order build of every slot reachable from `start`
    fn build_from(
        &self,
        start: NodeIndex,
        marks: &mut [Mark],
        built: &mut [Option<Arc<CategoryNode>>],
    ) {
        // (slot, position of the next child edge to follow, kept child slots)
        let mut stack: Vec<(NodeIndex, usize, Vec<NodeIndex>)> = vec![(start, 0, Vec::new())];
        marks[start] = Mark::OnPath;

        while let Some((index, next, kept)) = stack.last_mut() {
            let edges = &self.slots[*index].children;

            if let Some(&child) = edges.get(*next) {
                *next += 1;
                match marks[child] {
                    Mark::OnPath => {
                        warn!(
                            "Category {} is its own ancestor; skipping edge",
                            self.slots[child].record.category_id
                        );
                    }
                    Mark::Done => kept.push(child),
                    Mark::Unvisited => {
                        kept.push(child);
                        marks[child] = Mark::OnPath;
                        stack.push((child, 0, Vec::new()));
                    }
                }
                continue;
            }

            let index = *index;
            let kept = std::mem::take(kept);
            stack.pop();

            let children = kept
                .into_iter()
                .filter_map(|child| built[child].clone())
                .collect();
            built[index] = Some(Arc::new(CategoryNode {
                record: self.slots[index].record.clone(),
                children,
            }));
            marks[index] = Mark::Done;
        }
    }
}

//! Category node model and forest queries
//!
//! A forest is a list of `Arc<CategoryNode>` roots. Nodes reached through
//! several edges (duplicated ids) are the same allocation, so every query
//! here that counts or searches visits each distinct node once. All walks use
//! an explicit stack; the depth of the input never reaches the call stack.

use crate::types::{CategoryId, CategoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One node of the category forest: the input record plus its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// The record this node was built from
    #[serde(flatten)]
    pub record: CategoryRecord,
    /// Child nodes in input order
    #[serde(default)]
    pub children: Vec<Arc<CategoryNode>>,
}

/// Identity of a node allocation, used to visit shared nodes once
fn node_key(node: &CategoryNode) -> usize {
    node as *const CategoryNode as usize
}

/// Largest subtree height among `starts`, sharing one height table so a
/// node reachable from several starts is measured once
fn tallest<'a>(starts: impl IntoIterator<Item = &'a CategoryNode>) -> usize {
    let mut heights: HashMap<usize, usize> = HashMap::new();
    let mut result = 0;

    for start in starts {
        let mut stack: Vec<(&CategoryNode, bool)> = vec![(start, false)];
        while let Some((node, expanded)) = stack.pop() {
            let key = node_key(node);
            if heights.contains_key(&key) {
                continue;
            }

            if expanded {
                let below = node
                    .children
                    .iter()
                    .filter_map(|child| heights.get(&node_key(child)))
                    .max()
                    .copied()
                    .unwrap_or(0);
                heights.insert(key, below + 1);
            } else {
                stack.push((node, true));
                stack.extend(
                    node.children
                        .iter()
                        .filter(|child| !heights.contains_key(&node_key(child)))
                        .map(|child| (child.as_ref(), false)),
                );
            }
        }
        result = result.max(heights.get(&node_key(start)).copied().unwrap_or(1));
    }

    result
}

impl CategoryNode {
    /// Identifier of this node
    pub fn id(&self) -> &CategoryId {
        &self.record.category_id
    }

    /// Height of the subtree rooted here; a leaf has depth 1
    pub fn depth(&self) -> usize {
        tallest(std::iter::once(self))
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &CategoryId) -> Option<&CategoryNode> {
        let mut iter = self.iter();
        iter.seen = Some(HashSet::new());
        iter.map(|(_, node)| node).find(|node| node.id() == id)
    }

    /// Pre-order iterator over this subtree, yielding `(level, node)`;
    /// this node is at level 0
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter {
            stack: vec![(0, self)],
            seen: None,
        }
    }
}

// Dropping a deep chain through the derived glue would recurse once per
// level; unlink uniquely owned children onto a heap stack instead.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(child) {
                pending.append(&mut node.children);
            }
        }
    }
}

/// Depth-first pre-order iterator over a forest
pub struct NodeIter<'a> {
    stack: Vec<(usize, &'a CategoryNode)>,
    seen: Option<HashSet<usize>>,
}

impl<'a> NodeIter<'a> {
    /// Iterate over every position of `forest`, roots at level 0.
    ///
    /// A shared node is yielded once per edge that leads to it, which is
    /// what a renderer wants.
    pub fn forest(forest: &'a [Arc<CategoryNode>]) -> Self {
        Self {
            stack: forest.iter().rev().map(|node| (0, node.as_ref())).collect(),
            seen: None,
        }
    }

    /// Iterate over each distinct node of `forest` once, at the position
    /// where pre-order first reaches it
    pub fn unique(forest: &'a [Arc<CategoryNode>]) -> Self {
        Self {
            seen: Some(HashSet::new()),
            ..Self::forest(forest)
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = (usize, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (level, node) = self.stack.pop()?;
            if let Some(seen) = &mut self.seen {
                if !seen.insert(node_key(node)) {
                    continue;
                }
            }
            self.stack
                .extend(node.children.iter().rev().map(|child| (level + 1, child.as_ref())));
            return Some((level, node));
        }
    }
}

/// Number of distinct nodes in the forest, roots and descendants
pub fn count_nodes(forest: &[Arc<CategoryNode>]) -> usize {
    NodeIter::unique(forest).count()
}

/// Height of the tallest tree in the forest; 0 for an empty forest
pub fn max_depth(forest: &[Arc<CategoryNode>]) -> usize {
    tallest(forest.iter().map(|root| root.as_ref()))
}

/// Find a node anywhere in the forest
pub fn find<'a>(forest: &'a [Arc<CategoryNode>], id: &CategoryId) -> Option<&'a CategoryNode> {
    NodeIter::unique(forest)
        .map(|(_, node)| node)
        .find(|node| node.id() == id)
}

/// Strip `children` and return the records in pre-order, each node once
pub fn flatten(forest: &[Arc<CategoryNode>]) -> Vec<CategoryRecord> {
    NodeIter::unique(forest)
        .map(|(_, node)| node.record.clone())
        .collect()
}

/// Path from a root down to the category `id`, inclusive.
///
/// Returns `None` if the category is not in the forest.
pub fn breadcrumb<'a>(
    forest: &'a [Arc<CategoryNode>],
    id: &CategoryId,
) -> Option<Vec<&'a CategoryNode>> {
    let mut path: Vec<&CategoryNode> = Vec::new();
    for (level, node) in NodeIter::unique(forest) {
        path.truncate(level);
        path.push(node);
        if node.id() == id {
            return Some(path);
        }
    }
    None
}

//! Category hierarchy module
//!
//! Converts the flat category list served by the backend into a forest of
//! nested nodes, and answers the questions the menu layer asks of it.
//!
//! # Overview
//!
//! - [`HierarchyBuilder`] runs the two-pass flat-to-tree conversion
//! - [`CategoryArena`] holds nodes by index while edges are being linked
//! - [`CategoryNode`] is the immutable result; repeated edges share one `Arc`
//! - [`HierarchyInspector`] reports what the builder silently absorbs
//!
//! # Example
//!
//! ```
//! use catalog_core::{build_hierarchy, CategoryRecord};
//!
//! let records = vec![
//!     CategoryRecord::new(1),
//!     CategoryRecord::new(2).with_parent(1),
//!     CategoryRecord::new(3).with_parent(99),
//! ];
//!
//! let forest = build_hierarchy(&records);
//! assert_eq!(forest.len(), 1);
//! assert_eq!(forest[0].children.len(), 1);
//! ```

mod arena;
mod builder;
mod inspector;
mod model;

pub use arena::{CategoryArena, NodeIndex};
pub use builder::{
    build_hierarchy, build_hierarchy_from_json, build_hierarchy_from_value, HierarchyBuilder,
};
pub use inspector::{DanglingReference, HierarchyInspector, HierarchyReport};
pub use model::{breadcrumb, count_nodes, find, flatten, max_depth, CategoryNode, NodeIter};

//! Flat-to-tree category hierarchy construction

use super::arena::CategoryArena;
use super::model::CategoryNode;
use crate::types::CategoryRecord;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Builds a forest of [`CategoryNode`] values from flat records.
///
/// Construction never fails and runs in time and memory linear in the input.
/// Records whose parent is missing from the input are left out of the forest.
/// Duplicated ids keep the fields of their last occurrence; every occurrence
/// still adds an edge, and all those edges share the one stored node.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    skip_invalid: bool,
}

impl HierarchyBuilder {
    /// Create a builder that skips malformed records in untyped input
    pub fn new() -> Self {
        Self { skip_invalid: true }
    }

    /// Set whether malformed array elements are skipped.
    ///
    /// When disabled, a single malformed element empties the whole result.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Link `records` into an arena without materializing it
    pub fn link(&self, records: &[CategoryRecord]) -> CategoryArena {
        let mut arena = CategoryArena::with_capacity(records.len());

        for record in records {
            arena.insert(record);
        }

        for record in records {
            // index_of cannot miss here, every record was inserted above
            let Some(index) = arena.index_of(&record.category_id) else {
                continue;
            };
            match &record.parent_id {
                None => arena.push_root(index),
                Some(parent_id) => match arena.index_of(parent_id) {
                    Some(parent) => arena.push_child(parent, index),
                    None => debug!(
                        "Dropping category {}: parent {} does not exist",
                        record.category_id, parent_id
                    ),
                },
            }
        }

        arena
    }

    /// Build the forest from typed records
    pub fn build(&self, records: &[CategoryRecord]) -> Vec<Arc<CategoryNode>> {
        self.link(records).materialize()
    }

    /// Extract records from an untyped JSON value.
    ///
    /// Anything other than an array yields no records.
    pub fn records_from_value(&self, value: &Value) -> Vec<CategoryRecord> {
        let Some(items) = value.as_array() else {
            debug!("Category input is not an array; returning no records");
            return Vec::new();
        };

        let mut records = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            match CategoryRecord::from_value(item) {
                Some(record) => records.push(record),
                None if self.skip_invalid => {
                    debug!("Skipping malformed category record at position {}", position);
                }
                None => {
                    debug!(
                        "Malformed category record at position {}; discarding input",
                        position
                    );
                    return Vec::new();
                }
            }
        }

        records
    }

    /// Build the forest from an untyped JSON value.
    ///
    /// Anything other than an array produces an empty forest.
    pub fn build_from_value(&self, value: &Value) -> Vec<Arc<CategoryNode>> {
        self.build(&self.records_from_value(value))
    }

    /// Build the forest from JSON text; unparseable text yields an empty forest
    pub fn build_from_json(&self, json: &str) -> Vec<Arc<CategoryNode>> {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.build_from_value(&value),
            Err(e) => {
                debug!("Category input is not valid JSON: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the category forest from typed records
pub fn build_hierarchy(records: &[CategoryRecord]) -> Vec<Arc<CategoryNode>> {
    HierarchyBuilder::new().build(records)
}

/// Build the category forest from a JSON value; non-arrays yield `[]`
pub fn build_hierarchy_from_value(value: &Value) -> Vec<Arc<CategoryNode>> {
    HierarchyBuilder::new().build_from_value(value)
}

/// Build the category forest from JSON text
pub fn build_hierarchy_from_json(json: &str) -> Vec<Arc<CategoryNode>> {
    HierarchyBuilder::new().build_from_json(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::model::{count_nodes, flatten};
    use crate::types::CategoryId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(nodes: &[Arc<CategoryNode>]) -> Vec<CategoryId> {
        nodes.iter().map(|n| n.record.category_id.clone()).collect()
    }

    #[test]
    fn test_dangling_parent_is_dropped() {
        let forest = build_hierarchy_from_value(&json!([
            {"category_id": 1, "parent_id": null},
            {"category_id": 2, "parent_id": 1},
            {"category_id": 3, "parent_id": 99}
        ]));

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].record.category_id, CategoryId::Int(1));
        assert_eq!(ids(&forest[0].children), vec![CategoryId::Int(2)]);
        assert!(forest[0].find(&CategoryId::Int(3)).is_none());
        assert_eq!(count_nodes(&forest), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_hierarchy(&[]).is_empty());
        assert!(build_hierarchy_from_value(&json!([])).is_empty());
    }

    #[test]
    fn test_non_array_input_yields_empty_forest() {
        assert!(build_hierarchy_from_value(&json!("not an array")).is_empty());
        assert!(build_hierarchy_from_value(&json!({"category_id": 1})).is_empty());
        assert!(build_hierarchy_from_value(&Value::Null).is_empty());
        assert!(build_hierarchy_from_json("\"not an array\"").is_empty());
        assert!(build_hierarchy_from_json("{{{").is_empty());
    }

    #[test]
    fn test_two_roots_keep_order() {
        let forest = build_hierarchy_from_value(&json!([
            {"category_id": 1, "parent_id": null},
            {"category_id": 2, "parent_id": null}
        ]));

        assert_eq!(ids(&forest), vec![CategoryId::Int(1), CategoryId::Int(2)]);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_child_before_parent_in_input() {
        let records = vec![
            CategoryRecord::new(3).with_parent(2),
            CategoryRecord::new(2).with_parent(1),
            CategoryRecord::new(1),
        ];

        let forest = build_hierarchy(&records);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].children.len(), 1);
        assert_eq!(
            forest[0].children[0].children[0].record.category_id,
            CategoryId::Int(3)
        );
    }

    #[test]
    fn test_sibling_order_follows_input() {
        let records = vec![
            CategoryRecord::new(1),
            CategoryRecord::new(30).with_parent(1),
            CategoryRecord::new(10).with_parent(1),
            CategoryRecord::new(20).with_parent(1),
        ];

        let forest = build_hierarchy(&records);
        assert_eq!(
            ids(&forest[0].children),
            vec![CategoryId::Int(30), CategoryId::Int(10), CategoryId::Int(20)]
        );
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let records = vec![
            CategoryRecord::new(1).with_attribute("name", "First"),
            CategoryRecord::new(2).with_parent(1),
            CategoryRecord::new(1).with_attribute("name", "Second"),
        ];

        let forest = build_hierarchy(&records);
        // both occurrences are roots and both point at the single stored node
        assert_eq!(forest.len(), 2);
        assert!(Arc::ptr_eq(&forest[0], &forest[1]));
        for root in &forest {
            assert_eq!(root.record.attributes.get_str("name"), Some("Second"));
            assert_eq!(ids(&root.children), vec![CategoryId::Int(2)]);
        }
    }

    #[test]
    fn test_repeated_duplicates_stay_linear() {
        // every level appears twice, so each node gets two edges to the next
        let levels = 40;
        let mut records = vec![CategoryRecord::new(0)];
        for i in 1..=levels {
            let record = CategoryRecord::new(i).with_parent(i - 1);
            records.push(record.clone());
            records.push(record);
        }

        let forest = build_hierarchy(&records);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 2);
        assert!(Arc::ptr_eq(&forest[0].children[0], &forest[0].children[1]));
        assert_eq!(count_nodes(&forest), levels as usize + 1);
        assert!(count_nodes(&forest) <= records.len());
        assert_eq!(forest[0].depth(), levels as usize + 1);
        assert_eq!(flatten(&forest).len(), levels as usize + 1);
    }

    #[test]
    fn test_deep_chain_builds() {
        let mut records = vec![CategoryRecord::new(0)];
        records.extend((1..200_000).map(|i| CategoryRecord::new(i).with_parent(i - 1)));

        let forest = build_hierarchy(&records);
        assert_eq!(forest.len(), 1);
        assert_eq!(count_nodes(&forest), records.len());
        assert_eq!(forest[0].depth(), records.len());
    }

    #[test]
    fn test_input_children_field_is_replaced() {
        let forest = build_hierarchy_from_json(
            r#"[{"category_id": 1, "children": ["stale"]}, {"category_id": 2, "parent_id": 1}]"#,
        );

        let rendered = serde_json::to_string(&forest).unwrap();
        assert_eq!(rendered.matches("\"children\"").count(), 2);
        assert!(!rendered.contains("stale"));
        assert_eq!(
            serde_json::to_value(&forest).unwrap(),
            json!([{
                "category_id": 1,
                "parent_id": null,
                "children": [{"category_id": 2, "parent_id": 1, "children": []}]
            }])
        );
    }

    #[test]
    fn test_self_parent_through_duplicate_terminates() {
        // the stored node is the self-parented one, yet the first occurrence
        // still makes it a root
        let records = vec![
            CategoryRecord::new(1),
            CategoryRecord::new(1).with_parent(1),
        ];

        let forest = build_hierarchy(&records);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());

        let records = vec![
            CategoryRecord::new(1).with_parent(1),
            CategoryRecord::new(1),
        ];
        let forest = build_hierarchy(&records);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_cycle_without_root_is_unreachable() {
        let records = vec![
            CategoryRecord::new(1).with_parent(2),
            CategoryRecord::new(2).with_parent(1),
            CategoryRecord::new(3),
        ];

        let forest = build_hierarchy(&records);
        assert_eq!(ids(&forest), vec![CategoryId::Int(3)]);
    }

    #[test]
    fn test_extra_fields_carried_through() {
        let forest = build_hierarchy_from_value(&json!([
            {"category_id": "art", "name": "Art", "icon": "palette"},
            {"category_id": "prints", "parent_id": "art", "name": "Prints"}
        ]));

        let root = &forest[0];
        assert_eq!(root.record.attributes.get_str("icon"), Some("palette"));
        assert_eq!(root.children[0].record.attributes.get_str("name"), Some("Prints"));

        let rendered = serde_json::to_value(&forest).unwrap();
        assert_eq!(
            rendered,
            json!([{
                "category_id": "art",
                "parent_id": null,
                "name": "Art",
                "icon": "palette",
                "children": [{
                    "category_id": "prints",
                    "parent_id": "art",
                    "name": "Prints",
                    "children": []
                }]
            }])
        );
    }

    #[test]
    fn test_malformed_elements_skipped_by_default() {
        let input = json!([
            {"category_id": 1},
            "garbage",
            {"name": "no id"},
            {"category_id": 2, "parent_id": 1}
        ]);

        let forest = HierarchyBuilder::new().build_from_value(&input);
        assert_eq!(count_nodes(&forest), 2);

        let strict = HierarchyBuilder::new().skip_invalid(false).build_from_value(&input);
        assert!(strict.is_empty());
    }

    #[test]
    fn test_node_count_bounded_by_input() {
        let records = vec![
            CategoryRecord::new(1),
            CategoryRecord::new(2).with_parent(1),
            CategoryRecord::new(3).with_parent(2),
            CategoryRecord::new(4).with_parent(77),
            CategoryRecord::new(5).with_parent(4),
        ];

        let forest = build_hierarchy(&records);
        // 4 dangles, so 5 hangs off a dropped node
        assert_eq!(count_nodes(&forest), 3);
        assert!(count_nodes(&forest) < records.len());

        let clean = &records[..3];
        assert_eq!(count_nodes(&build_hierarchy(clean)), clean.len());
    }

    #[test]
    fn test_rebuild_from_flattened_is_isomorphic() {
        let records = vec![
            CategoryRecord::new(1).with_attribute("name", "Electronics"),
            CategoryRecord::new(2).with_parent(1).with_attribute("name", "Phones"),
            CategoryRecord::new(3).with_parent(1).with_attribute("name", "Laptops"),
            CategoryRecord::new(4).with_parent(2).with_attribute("name", "Android"),
            CategoryRecord::new(5).with_attribute("name", "Art"),
        ];

        let forest = build_hierarchy(&records);
        let rebuilt = build_hierarchy(&flatten(&forest));
        assert_eq!(rebuilt, forest);
    }

    #[test]
    fn test_link_exposes_arena() {
        let records = vec![CategoryRecord::new(1), CategoryRecord::new(2).with_parent(1)];
        let arena = HierarchyBuilder::new().link(&records);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.roots().len(), 1);
        let root = arena.roots()[0];
        assert_eq!(arena.children(root).len(), 1);
    }
}

//! JSON renderer for category forests

use super::renderer::Renderer;
use crate::error::Result;
use crate::hierarchy::CategoryNode;
use std::sync::Arc;

/// Serializes the forest as the nested JSON the menu component consumes
pub struct JsonRenderer {
    pretty: bool,
    name: String,
}

impl JsonRenderer {
    /// Create a new JSON renderer
    pub fn new(compact: bool) -> Self {
        Self {
            pretty: !compact,
            name: if compact {
                "json-compact".to_string()
            } else {
                "json".to_string()
            },
        }
    }

    /// Create a compact JSON renderer
    pub fn compact() -> Self {
        Self::new(true)
    }

    /// Create a pretty-printed JSON renderer
    pub fn pretty() -> Self {
        Self::new(false)
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, forest: &[Arc<CategoryNode>]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(forest)?
        } else {
            serde_json::to_string(forest)?
        };

        Ok(json)
    }

    fn format_name(&self) -> &str {
        &self.name
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy_from_value;
    use serde_json::{json, Value};

    #[test]
    fn test_compact_json() {
        let forest = build_hierarchy_from_value(&json!([{"category_id": 1}]));
        let out = JsonRenderer::compact().render(&forest).unwrap();
        assert!(!out.contains('\n'));

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!([{"category_id": 1, "parent_id": null, "children": []}])
        );
    }

    #[test]
    fn test_pretty_json_round_trips_forest() {
        let forest = build_hierarchy_from_value(&json!([
            {"category_id": 1, "name": "Art"},
            {"category_id": 2, "parent_id": 1, "name": "Prints"}
        ]));
        let out = JsonRenderer::pretty().render(&forest).unwrap();
        assert!(out.contains('\n'));

        let back: Vec<Arc<CategoryNode>> = serde_json::from_str(&out).unwrap();
        assert_eq!(back, forest);
    }

    #[test]
    fn test_empty_forest() {
        assert_eq!(JsonRenderer::compact().render(&[]).unwrap(), "[]");
    }
}

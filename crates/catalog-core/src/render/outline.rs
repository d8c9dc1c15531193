//! Text renderers: indented outline and markdown list

use super::renderer::{RenderOptions, Renderer};
use crate::error::Result;
use crate::hierarchy::{CategoryNode, NodeIter};
use std::sync::Arc;

/// Indented plain-text tree, one category per line
pub struct OutlineRenderer {
    options: RenderOptions,
}

impl OutlineRenderer {
    /// Create a new outline renderer
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for OutlineRenderer {
    fn render(&self, forest: &[Arc<CategoryNode>]) -> Result<String> {
        let mut output = String::new();
        for (level, node) in NodeIter::forest(forest) {
            output.push_str(&" ".repeat(level * self.options.indent));
            output.push_str(&self.options.label(&node.record));
            output.push('\n');
        }
        Ok(output)
    }

    fn format_name(&self) -> &str {
        "outline"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

/// Markdown nested bullet list
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, forest: &[Arc<CategoryNode>]) -> Result<String> {
        let mut output = String::new();
        // markdown needs at least two spaces to nest a list item
        let indent = self.options.indent.max(2);
        for (level, node) in NodeIter::forest(forest) {
            output.push_str(&" ".repeat(level * indent));
            output.push_str("- ");
            output.push_str(&self.options.label(&node.record));
            output.push('\n');
        }
        Ok(output)
    }

    fn format_name(&self) -> &str {
        "markdown"
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy;
    use crate::types::CategoryRecord;
    use pretty_assertions::assert_eq;

    fn sample_forest() -> Vec<Arc<CategoryNode>> {
        build_hierarchy(&[
            CategoryRecord::new(1).with_attribute("name", "Electronics"),
            CategoryRecord::new(2).with_parent(1).with_attribute("name", "Phones"),
            CategoryRecord::new(3).with_parent(2).with_attribute("name", "Android"),
            CategoryRecord::new(4).with_attribute("name", "Art"),
        ])
    }

    #[test]
    fn test_outline() {
        let out = OutlineRenderer::new(RenderOptions::default())
            .render(&sample_forest())
            .unwrap();
        assert_eq!(out, "Electronics\n  Phones\n    Android\nArt\n");
    }

    #[test]
    fn test_outline_custom_indent_and_ids() {
        let options = RenderOptions {
            indent: 4,
            show_ids: true,
            ..Default::default()
        };
        let out = OutlineRenderer::new(options).render(&sample_forest()).unwrap();
        assert_eq!(
            out,
            "Electronics (1)\n    Phones (2)\n        Android (3)\nArt (4)\n"
        );
    }

    #[test]
    fn test_markdown() {
        let out = MarkdownRenderer::new(RenderOptions::default())
            .render(&sample_forest())
            .unwrap();
        assert_eq!(out, "- Electronics\n  - Phones\n    - Android\n- Art\n");
    }

    #[test]
    fn test_label_field_falls_back_to_id() {
        let options = RenderOptions {
            label_field: "title".to_string(),
            ..Default::default()
        };
        let out = OutlineRenderer::new(options).render(&sample_forest()).unwrap();
        assert_eq!(out, "1\n  2\n    3\n4\n");
    }

    #[test]
    fn test_outline_of_long_chain() {
        let options = RenderOptions {
            indent: 0,
            ..Default::default()
        };
        let mut records = vec![CategoryRecord::new(0)];
        records.extend((1..100_000).map(|i| CategoryRecord::new(i).with_parent(i - 1)));

        let out = OutlineRenderer::new(options)
            .render(&build_hierarchy(&records))
            .unwrap();
        assert_eq!(out.lines().count(), 100_000);
        assert_eq!(out.lines().last(), Some("99999"));
    }

    #[test]
    fn test_shared_node_rendered_at_each_position() {
        let forest = build_hierarchy(&[
            CategoryRecord::new(1).with_attribute("name", "Art"),
            CategoryRecord::new(2).with_parent(1).with_attribute("name", "Prints"),
            CategoryRecord::new(2).with_parent(1).with_attribute("name", "Posters"),
        ]);

        let out = OutlineRenderer::new(RenderOptions::default())
            .render(&forest)
            .unwrap();
        assert_eq!(out, "Art\n  Posters\n  Posters\n");
    }

    #[test]
    fn test_empty_forest_renders_nothing() {
        let out = MarkdownRenderer::new(RenderOptions::default())
            .render(&[])
            .unwrap();
        assert!(out.is_empty());
    }
}

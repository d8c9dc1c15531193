//! Renderer trait and manager

use crate::config::RenderConfig;
use crate::error::{CatalogError, Result};
use crate::hierarchy::CategoryNode;
use crate::types::CategoryRecord;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Options shared by the text renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Attribute used as the display label
    pub label_field: String,
    /// Spaces per nesting level
    pub indent: usize,
    /// Append the category id to each label
    pub show_ids: bool,
}

impl RenderOptions {
    /// Build options from the render section of the config
    pub fn from_config(label_field: impl Into<String>, render: &RenderConfig) -> Self {
        Self {
            label_field: label_field.into(),
            indent: render.indent,
            show_ids: render.show_ids,
        }
    }

    /// Label for a record according to these options
    pub fn label(&self, record: &CategoryRecord) -> String {
        let label = record.label(&self.label_field);
        if self.show_ids {
            format!("{} ({})", label, record.category_id)
        } else {
            label
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            label_field: "name".to_string(),
            indent: 2,
            show_ids: false,
        }
    }
}

/// Trait for forest renderers
pub trait Renderer: Send + Sync {
    /// Render a forest to string
    fn render(&self, forest: &[Arc<CategoryNode>]) -> Result<String>;

    /// Get the format name
    fn format_name(&self) -> &str;

    /// Get the file extension
    fn file_extension(&self) -> &str;
}

/// Manager for handling multiple render formats
pub struct RenderManager {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl RenderManager {
    /// Create a new render manager with default renderers
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Create a manager whose text renderers use `options`
    pub fn with_options(options: RenderOptions) -> Self {
        let mut manager = Self {
            renderers: HashMap::new(),
        };

        manager.register(Box::new(super::json::JsonRenderer::new(false)));
        manager.register(Box::new(super::json::JsonRenderer::compact()));
        manager.register(Box::new(super::outline::OutlineRenderer::new(options.clone())));
        manager.register(Box::new(super::outline::MarkdownRenderer::new(options)));

        manager
    }

    /// Register a new renderer
    pub fn register(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers
            .insert(renderer.format_name().to_string(), renderer);
    }

    /// Render a forest in the specified format
    pub fn render(&self, forest: &[Arc<CategoryNode>], format: &str) -> Result<String> {
        let renderer = self.get(format).ok_or_else(|| {
            CatalogError::Validation(format!("Unknown render format: {}", format))
        })?;

        renderer.render(forest)
    }

    /// Render a forest to a file
    pub fn render_to_file(&self, forest: &[Arc<CategoryNode>], format: &str, path: &Path) -> Result<()> {
        let renderer = self.get(format).ok_or_else(|| {
            CatalogError::Validation(format!("Unknown render format: {}", format))
        })?;
        let content = renderer.render(forest)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let final_path = if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(renderer.file_extension())
        };

        // Atomic write using temp file
        let temp_path = final_path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }

        fs::rename(&temp_path, &final_path)?;
        Ok(())
    }

    /// Get list of available format names
    pub fn available_formats(&self) -> Vec<String> {
        let mut formats: Vec<_> = self.renderers.keys().cloned().collect();
        formats.sort();
        formats
    }

    /// Check if a format is available
    pub fn has_format(&self, format: &str) -> bool {
        self.renderers.contains_key(format)
    }

    /// Get a renderer by format name
    pub fn get(&self, format: &str) -> Option<&dyn Renderer> {
        self.renderers.get(format).map(|r| r.as_ref())
    }
}

impl Default for RenderManager {
    fn default() -> Self {
        Self::new()
    }
}

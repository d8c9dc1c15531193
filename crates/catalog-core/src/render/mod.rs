//! Rendering of category forests
//!
//! The storefront shows the category forest as a nested menu. This module
//! turns a forest into text the same way:
//! - JSON format (pretty and compact)
//! - Indented outline
//! - Markdown nested list
//!
//! # Example
//!
//! ```
//! use catalog_core::render::RenderManager;
//! use catalog_core::{build_hierarchy, CategoryRecord};
//!
//! let forest = build_hierarchy(&[CategoryRecord::new(1).with_attribute("name", "Art")]);
//! let manager = RenderManager::new();
//! let text = manager.render(&forest, "outline").unwrap();
//! assert_eq!(text, "Art\n");
//! ```

mod json;
mod outline;
mod renderer;

pub use json::JsonRenderer;
pub use outline::{MarkdownRenderer, OutlineRenderer};
pub use renderer::{RenderManager, RenderOptions, Renderer};

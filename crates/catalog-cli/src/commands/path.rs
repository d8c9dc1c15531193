//! Path command
//!
//! Print the breadcrumb from a root category down to the given one.

use anyhow::{Context, Result};
use catalog_core::build_hierarchy;
use catalog_core::hierarchy::breadcrumb;
use catalog_core::render::RenderOptions;
use catalog_core::{CatalogError, CategoryId};
use clap::Args;

use super::source::{load_records, InputArgs};
use super::AppContext;

/// Arguments for the path command
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Category ID (digits are read as a numeric id)
    pub category: String,

    /// Treat the ID as a string even if it is all digits
    #[arg(long)]
    pub string_id: bool,

    /// Separator between path segments
    #[arg(long, default_value = " > ")]
    pub separator: String,

    #[command(flatten)]
    pub source: InputArgs,
}

impl PathArgs {
    fn category_id(&self) -> CategoryId {
        if self.string_id {
            CategoryId::from(self.category.as_str())
        } else {
            CategoryId::parse(&self.category)
        }
    }
}

/// Execute the path command
pub fn execute(args: PathArgs, ctx: &AppContext) -> Result<()> {
    let loaded = load_records(&args.source, &ctx.config)?;
    let forest = build_hierarchy(&loaded.records);

    let id = args.category_id();
    let path = breadcrumb(&forest, &id)
        .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))
        .with_context(|| format!("Category {} is not reachable in {}", id, loaded.origin))?;

    let options = RenderOptions::from_config(&ctx.config.hierarchy.label_field, &ctx.config.render);
    let labels: Vec<String> = path.iter().map(|node| options.label(&node.record)).collect();
    println!("{}", labels.join(args.separator.as_str()));

    Ok(())
}

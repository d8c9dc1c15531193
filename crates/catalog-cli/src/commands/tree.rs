//! Tree command
//!
//! Render the category forest in one of the supported formats.

use anyhow::{Context, Result};
use catalog_core::build_hierarchy;
use catalog_core::hierarchy::count_nodes;
use catalog_core::render::{RenderManager, RenderOptions};
use clap::{Args, ValueEnum};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use super::source::{load_records, InputArgs};
use super::AppContext;

/// Render format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    /// Pretty-printed nested JSON
    Json,
    /// Single-line nested JSON
    JsonCompact,
    /// Indented outline
    Outline,
    /// Markdown nested list
    Markdown,
}

impl TreeFormat {
    /// Renderer name for this format
    pub fn name(self) -> &'static str {
        match self {
            TreeFormat::Json => "json",
            TreeFormat::JsonCompact => "json-compact",
            TreeFormat::Outline => "outline",
            TreeFormat::Markdown => "markdown",
        }
    }
}

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Render format (defaults to render.default_format)
    #[arg(long, short, value_enum)]
    pub format: Option<TreeFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Append category ids to labels
    #[arg(long)]
    pub show_ids: bool,
}

/// Execute the tree command
pub fn execute(args: TreeArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let config = &ctx.config;
    let loaded = load_records(&args.source, config)?;

    let forest = build_hierarchy(&loaded.records);

    let mut options = RenderOptions::from_config(&config.hierarchy.label_field, &config.render);
    options.show_ids |= args.show_ids;
    let manager = RenderManager::with_options(options);

    let format = args
        .format
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| config.render.default_format.clone());

    let total = count_nodes(&forest);
    eprintln!(
        "Built {} categories ({} roots) from {}",
        total.to_string().yellow(),
        forest.len().to_string().yellow(),
        loaded.origin.cyan()
    );
    let distinct: HashSet<_> = loaded.records.iter().map(|r| &r.category_id).collect();
    if total < distinct.len() {
        eprintln!(
            "{} {} categories were not attached; run '{}' for details",
            "⚠".yellow(),
            distinct.len() - total,
            "catalog check".cyan()
        );
    }

    if let Some(output_path) = args.output {
        manager
            .render_to_file(&forest, &format, &output_path)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        eprintln!("{} Written to {}", "✓".green(), output_path.display());
    } else {
        let output = manager.render(&forest, &format)?;
        std::io::stdout()
            .write_all(output.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

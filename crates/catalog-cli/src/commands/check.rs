//! Check command
//!
//! Report what the tree builder silently absorbs: duplicate ids, dangling
//! parent references, parent cycles and unreachable records.

use anyhow::Result;
use catalog_core::hierarchy::{HierarchyInspector, HierarchyReport};
use catalog_core::CategoryId;
use clap::Args;

use super::source::{load_records, InputArgs};
use super::AppContext;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error if any issue is found
    #[arg(long)]
    pub strict: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs, ctx: &AppContext) -> Result<()> {
    let loaded = load_records(&args.source, &ctx.config)?;
    let report = HierarchyInspector::new().inspect(&loaded.records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &loaded.origin);
    }

    if args.strict && !report.is_clean() {
        anyhow::bail!("{} issue(s) found in {}", report.issue_count(), loaded.origin);
    }

    Ok(())
}

fn join_ids(ids: &[CategoryId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_report(report: &HierarchyReport, origin: &str) {
    use colored::Colorize;

    println!("{} {}", "Checking".bold(), origin.cyan());
    println!();
    println!("  Records:   {}", report.records);
    println!("  Nodes:     {}", report.nodes);
    println!("  Roots:     {}", report.roots);
    println!("  Max depth: {}", report.max_depth);
    println!();

    if report.is_clean() {
        println!("{} No issues found", "✓".green());
        return;
    }

    if !report.duplicate_ids.is_empty() {
        println!(
            "{} Duplicate ids (last occurrence wins): {}",
            "⚠".yellow(),
            join_ids(&report.duplicate_ids)
        );
    }

    for dangling in &report.dangling {
        println!(
            "{} Category {} references missing parent {}",
            "✗".red(),
            dangling.category_id.to_string().bold(),
            dangling.parent_id
        );
    }

    if !report.cyclic.is_empty() {
        println!(
            "{} Parent cycle through: {}",
            "✗".red(),
            join_ids(&report.cyclic)
        );
    }

    if !report.unreachable.is_empty() {
        println!(
            "{} Not reachable from any root: {}",
            "⚠".yellow(),
            join_ids(&report.unreachable)
        );
    }

    println!();
    println!(
        "{} issue(s) found",
        report.issue_count().to_string().yellow()
    );
}

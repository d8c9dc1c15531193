//! Import command
//!
//! Store a category JSON file as a snapshot.

use anyhow::{Context, Result};
use catalog_core::snapshot::{SnapshotManager, SnapshotMetadata};
use clap::Args;
use std::path::PathBuf;

use super::source::{open_storage, parse_records, read_input_file};
use super::AppContext;

/// Arguments for the import command
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Category JSON file (`-` for stdin)
    pub file: PathBuf,

    /// Label stored with the snapshot
    #[arg(long, short)]
    pub label: Option<String>,

    /// Snapshot storage directory
    #[arg(long, env = "CATALOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Execute the import command
pub fn execute(args: ImportArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let text = read_input_file(&args.file)?;
    let records = parse_records(&text, &ctx.config)?;
    if records.is_empty() {
        eprintln!(
            "{} {} contains no category records",
            "⚠".yellow(),
            args.file.display()
        );
    }

    let manager = SnapshotManager::new(open_storage(args.data_dir.as_deref(), &ctx.config)?);
    let metadata = SnapshotMetadata {
        source: Some(args.file.display().to_string()),
        label: args.label,
    };
    let snapshot = manager
        .create(records, metadata)
        .context("Failed to store snapshot")?;

    eprintln!(
        "{} Stored {} records as snapshot {}",
        "✓".green(),
        snapshot.record_count().to_string().yellow(),
        snapshot.id.to_string().cyan()
    );
    println!("{}", snapshot.id);

    Ok(())
}

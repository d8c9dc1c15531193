//! Snapshot command
//!
//! List, inspect and remove stored category snapshots.

use anyhow::{Context, Result};
use catalog_core::hierarchy::count_nodes;
use catalog_core::snapshot::SnapshotManager;
use catalog_core::types::SnapshotId;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::source::open_storage;
use super::AppContext;

/// Snapshot subcommands
#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// List stored snapshots, newest first
    List {
        #[command(flatten)]
        storage: StorageArgs,

        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a snapshot
    Show {
        /// Snapshot ID
        id: String,

        #[command(flatten)]
        storage: StorageArgs,
    },

    /// Delete a snapshot
    Delete {
        /// Snapshot ID
        id: String,

        #[command(flatten)]
        storage: StorageArgs,
    },

    /// Delete snapshots older than the given number of days
    Clean {
        /// Age in days
        #[arg(long, default_value_t = 30)]
        days: i64,

        #[command(flatten)]
        storage: StorageArgs,
    },
}

/// Storage location flags
#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    /// Snapshot storage directory
    #[arg(long, env = "CATALOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Execute the snapshot command
pub fn execute(cmd: SnapshotCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        SnapshotCommand::List { storage, json } => list(&manager(&storage, ctx)?, json),
        SnapshotCommand::Show { id, storage } => show(&manager(&storage, ctx)?, &id),
        SnapshotCommand::Delete { id, storage } => delete(&manager(&storage, ctx)?, &id),
        SnapshotCommand::Clean { days, storage } => clean(&manager(&storage, ctx)?, days),
    }
}

fn manager(storage: &StorageArgs, ctx: &AppContext) -> Result<SnapshotManager> {
    Ok(SnapshotManager::new(open_storage(
        storage.data_dir.as_deref(),
        &ctx.config,
    )?))
}

fn parse_id(id: &str) -> Result<SnapshotId> {
    SnapshotId::from_string(id).with_context(|| format!("Invalid snapshot ID: {}", id))
}

fn list(manager: &SnapshotManager, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let snapshots = manager.list()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No snapshots found.");
        return Ok(());
    }

    for info in snapshots {
        let label = info
            .label
            .map(|l| format!(" [{}]", l))
            .unwrap_or_default();
        println!(
            "{}  {}  {:>6} records{}",
            info.id.to_string().cyan(),
            info.created_at.format("%Y-%m-%d %H:%M:%S"),
            info.record_count,
            label.dimmed()
        );
    }

    Ok(())
}

fn show(manager: &SnapshotManager, id: &str) -> Result<()> {
    use colored::Colorize;

    let id = parse_id(id)?;
    let snapshot = manager
        .load(&id)
        .with_context(|| format!("Snapshot '{}' not found", id))?;
    let forest = snapshot.forest();

    println!("{}", "Snapshot:".bold().underline());
    println!("  ID:      {}", snapshot.id.to_string().cyan());
    println!(
        "  Created: {}",
        snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(source) = &snapshot.metadata.source {
        println!("  Source:  {}", source);
    }
    if let Some(label) = &snapshot.metadata.label {
        println!("  Label:   {}", label);
    }
    println!("  Records: {}", snapshot.record_count());
    println!("  Nodes:   {}", count_nodes(&forest));
    println!("  Roots:   {}", forest.len());

    Ok(())
}

fn delete(manager: &SnapshotManager, id: &str) -> Result<()> {
    use colored::Colorize;

    let id = parse_id(id)?;
    manager
        .delete(&id)
        .with_context(|| format!("Failed to delete snapshot '{}'", id))?;
    println!("{} Deleted snapshot {}", "✓".green(), id);

    Ok(())
}

fn clean(manager: &SnapshotManager, days: i64) -> Result<()> {
    use colored::Colorize;

    if days < 0 {
        anyhow::bail!("--days must not be negative");
    }
    let before = chrono::Utc::now() - chrono::Duration::days(days);
    let removed = manager.clean(before)?;
    println!(
        "{} Removed {} snapshot(s) older than {} days",
        "✓".green(),
        removed,
        days
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert!(parse_id("20240101120000-deadbeef").is_ok());
        assert!(parse_id("latest").is_err());
    }
}

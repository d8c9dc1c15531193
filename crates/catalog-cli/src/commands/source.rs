//! Where category records come from
//!
//! Commands that read categories accept either a JSON file (or `-` for
//! stdin) or a stored snapshot.

use anyhow::{bail, Context, Result};
use catalog_core::config::Config;
use catalog_core::hierarchy::HierarchyBuilder;
use catalog_core::snapshot::SnapshotManager;
use catalog_core::types::{CategoryRecord, SnapshotId};
use catalog_storage::FileSystemStorage;
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input selection shared by commands that read categories
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Category JSON file (`-` for stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Snapshot ID to read
    #[arg(long, short, conflicts_with = "input")]
    pub snapshot: Option<String>,

    /// Read the latest snapshot
    #[arg(long, conflicts_with_all = ["input", "snapshot"])]
    pub latest: bool,

    /// Snapshot storage directory
    #[arg(long, env = "CATALOG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Records read from an input, plus a human-readable origin
#[derive(Debug)]
pub struct LoadedRecords {
    pub records: Vec<CategoryRecord>,
    pub origin: String,
}

/// Open snapshot storage from the flag, the config, or the platform default
pub fn open_storage(data_dir: Option<&Path>, config: &Config) -> Result<FileSystemStorage> {
    let base_dir = data_dir
        .map(Path::to_path_buf)
        .or_else(|| config.storage.data_dir.clone())
        .unwrap_or_else(FileSystemStorage::default_base_dir);

    debug!("Using snapshot storage at {:?}", base_dir);
    FileSystemStorage::new(&base_dir)
        .with_context(|| format!("Failed to open snapshot storage at {}", base_dir.display()))
}

/// Parse category JSON text into records using the configured builder.
///
/// Text that is not a JSON array produces no records rather than an error.
pub fn parse_records(text: &str, config: &Config) -> Result<Vec<CategoryRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("Category input is not valid JSON")?;
    let builder = HierarchyBuilder::new().skip_invalid(config.hierarchy.skip_invalid_records);
    Ok(builder.records_from_value(&value))
}

/// Read a category JSON file, or stdin for `-`
pub fn read_input_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read categories from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Load records according to `args`
pub fn load_records(args: &InputArgs, config: &Config) -> Result<LoadedRecords> {
    if let Some(input) = &args.input {
        let text = read_input_file(input)?;
        return Ok(LoadedRecords {
            records: parse_records(&text, config)?,
            origin: input.display().to_string(),
        });
    }

    let manager = SnapshotManager::new(open_storage(args.data_dir.as_deref(), config)?);

    let snapshot = if let Some(id) = &args.snapshot {
        let id = SnapshotId::from_string(id.as_str())
            .with_context(|| format!("Invalid snapshot ID: {}", id))?;
        manager
            .load(&id)
            .with_context(|| format!("Snapshot '{}' not found", id))?
    } else if args.latest {
        manager.load_latest()?.context("No snapshots found")?
    } else {
        bail!("No input specified. Use --input <FILE>, --snapshot <ID> or --latest");
    };

    Ok(LoadedRecords {
        origin: format!("snapshot {}", snapshot.id),
        records: snapshot.records,
    })
}

//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod config;
pub mod import;
pub mod path;
pub mod snapshot;
pub mod source;
pub mod tree;

use anyhow::{Context, Result};
use catalog_core::config::{Config, DEFAULT_CONFIG_PATH};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// catalog - build and inspect marketplace category trees
#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the category tree
    Tree(tree::TreeArgs),

    /// Report inconsistencies in category data
    Check(check::CheckArgs),

    /// Show the path from the root to a category
    Path(path::PathArgs),

    /// Store a category list as a snapshot
    Import(import::ImportArgs),

    /// Manage stored snapshots
    #[command(subcommand)]
    Snapshot(snapshot::SnapshotCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Resolved configuration shared by the commands
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // config commands load the file themselves so they work on a broken one
    match cli.command {
        Commands::Tree(args) => tree::execute(args, &load_context(&config_path)?),
        Commands::Check(args) => check::execute(args, &load_context(&config_path)?),
        Commands::Path(args) => path::execute(args, &load_context(&config_path)?),
        Commands::Import(args) => import::execute(args, &load_context(&config_path)?),
        Commands::Snapshot(cmd) => snapshot::execute(cmd, &load_context(&config_path)?),
        Commands::Config(cmd) => config::execute(cmd, &config_path),
    }
}

fn load_context(config_path: &Path) -> Result<AppContext> {
    let config = Config::load_or_default(config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.display()
        )
    })?;
    Ok(AppContext { config })
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

//! Config command
//!
//! Manage catalog configuration.

use anyhow::{Context, Result};
use catalog_core::config::Config;
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Reset { force } => reset_config(config_path, force),
        ConfigCommand::Validate => validate_config(config_path),
        ConfigCommand::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let (config, from_file) = if config_path.exists() {
        (Config::load(config_path)?, true)
    } else {
        (Config::default(), false)
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if from_file {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} not found, showing defaults", config_path.display()).dimmed()
        );
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn reset_config(config_path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    use colored::Colorize;

    if !config_path.exists() {
        anyhow::bail!("Configuration not found at {}", config_path.display());
    }

    let content = fs::read_to_string(config_path)?;
    let raw: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in {}", config_path.display()))?;
    println!("{} Configuration is valid TOML", "✓".green());

    let mut warnings = Vec::new();
    for section in ["hierarchy", "render", "storage"] {
        if raw.get(section).is_none() {
            warnings.push(format!("[{}] section not found, defaults apply", section));
        }
    }
    for warning in &warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }

    Config::load(config_path).context("Configuration values are invalid")?;
    println!("{} All values are valid", "✓".green());

    Ok(())
}

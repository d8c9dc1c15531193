//! Configuration management for catalog

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".catalog/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hierarchy settings
    pub hierarchy: HierarchyConfig,
    /// Render settings
    pub render: RenderConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<()> {
        if self.hierarchy.label_field.trim().is_empty() {
            return Err(CatalogError::Config(
                "hierarchy.label_field cannot be empty".to_string(),
            ));
        }
        if self.render.indent > 16 {
            return Err(CatalogError::Config(format!(
                "render.indent must be at most 16, got {}",
                self.render.indent
            )));
        }
        Ok(())
    }
}

/// Hierarchy-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Attribute used as the display label
    pub label_field: String,
    /// Skip malformed records instead of discarding the whole input
    pub skip_invalid_records: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            label_field: "name".to_string(),
            skip_invalid_records: true,
        }
    }
}

/// Render-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Default render format
    pub default_format: String,
    /// Spaces per nesting level
    pub indent: usize,
    /// Append category ids to labels
    pub show_ids: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_format: "outline".to_string(),
            indent: 2,
            show_ids: false,
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot directory; the platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hierarchy.label_field, "name");
        assert!(config.hierarchy.skip_invalid_records);
        assert_eq!(config.render.default_format, "outline");
        assert_eq!(config.render.indent, 2);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[hierarchy]"));
        assert!(toml.contains("[render]"));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[render]\nshow_ids = true\n").unwrap();
        assert!(config.render.show_ids);
        assert_eq!(config.render.indent, 2);
        assert_eq!(config.hierarchy.label_field, "name");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.hierarchy.label_field = "title".to_string();
        config.storage.data_dir = Some(PathBuf::from("/tmp/catalog"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        assert!(matches!(
            Config::load(&path),
            Err(CatalogError::FileNotFound(_))
        ));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.hierarchy.label_field = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render.indent = 40;
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[render\nindent = ").unwrap();
        assert!(matches!(Config::load(&path), Err(CatalogError::Toml(_))));
    }
}

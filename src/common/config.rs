use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global clean-my-mac configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How many days backup batches are retained before purge
    #[serde(default = "default_retention_days")]
    pub backup_retention_days: u32,

    /// Take a backup before cleaning moderate-safety categories
    #[serde(default = "default_backup_by_default")]
    pub backup_by_default: bool,

    /// Minimum file size considered by the duplicate detector, in bytes
    #[serde(default = "default_min_duplicate_size")]
    pub min_duplicate_size: u64,

    /// How deep to search project roots for node_modules directories
    #[serde(default = "default_node_scan_depth")]
    pub node_scan_depth: usize,

    /// Paths to exclude from scanning (substring match)
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

fn default_retention_days() -> u32 {
    7
}
fn default_backup_by_default() -> bool {
    true
}
fn default_min_duplicate_size() -> u64 {
    1024
}
fn default_node_scan_depth() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_retention_days: default_retention_days(),
            backup_by_default: default_backup_by_default(),
            min_duplicate_size: default_min_duplicate_size(),
            node_scan_depth: default_node_scan_depth(),
            exclude_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Get the clean-my-mac data directory (~/.clean-my-mac)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".clean-my-mac")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the backup root directory
    pub fn backup_dir() -> PathBuf {
        Self::data_dir().join("backup")
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Set a single config value from its string form.
    /// `exclude_paths` takes a comma-separated list.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backup_retention_days" => {
                self.backup_retention_days = value
                    .parse()
                    .with_context(|| format!("invalid value for {}: '{}'", key, value))?;
            }
            "backup_by_default" => {
                self.backup_by_default = value
                    .parse()
                    .with_context(|| format!("invalid value for {}: '{}'", key, value))?;
            }
            "min_duplicate_size" => {
                self.min_duplicate_size = value
                    .parse()
                    .with_context(|| format!("invalid value for {}: '{}'", key, value))?;
            }
            "node_scan_depth" => {
                self.node_scan_depth = value
                    .parse()
                    .with_context(|| format!("invalid value for {}: '{}'", key, value))?;
            }
            "exclude_paths" => {
                self.exclude_paths = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            _ => bail!("unknown config key '{}'", key),
        }
        Ok(())
    }
}

//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use pedigree_core::limits::DEFAULT_GENERATIONS;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pedigree")
}

/// Default location of the config file
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pedigree")
        .join("config.toml")
}

pub fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        Config::keys().join(", ")
    )
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the registry database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Output format used when `--format` is not given
    pub format: String,
    /// Generations shown by `horse tree` when `--generations` is not given
    pub default_generations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            format: "table".to_string(),
            default_generations: DEFAULT_GENERATIONS,
        }
    }
}

impl Config {
    /// Load the config at `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the config to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["data_dir", "format", "default_generations"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => Some(
                self.data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            "format" => Some(self.format.clone()),
            "default_generations" => Some(self.default_generations.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => {
                self.data_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "format" => {
                let format: OutputFormat = value.parse()?;
                self.format = format.as_str().to_string();
            }
            "default_generations" => {
                self.default_generations = value.trim().parse().with_context(|| {
                    format!("default_generations must be a non-negative integer, got '{}'", value)
                })?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Put `key` back to its default value
    pub fn unset(&mut self, key: &str) -> anyhow::Result<()> {
        let defaults = Self::default();
        match key {
            "data_dir" => self.data_dir = defaults.data_dir,
            "format" => self.format = defaults.format,
            "default_generations" => self.default_generations = defaults.default_generations,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Data directory, or the platform default when unset
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

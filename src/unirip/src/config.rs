//! Configuration management for unirip

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use unirip::ExtractOptions;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Glob patterns over type tags to leave out of the export
    pub exclude_types: Vec<String>,
    pub pretty_manifest: bool,
    /// Log filter used when neither RUST_LOG nor --verbose is given
    pub log_level: Option<String>,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("unirip");

        Ok(config_dir.join("config.toml"))
    }

    /// Load an explicitly given config file, or the default one if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Extraction options from config plus extra exclusions given on the command line
    pub fn extract_options(&self, extra_excludes: &[String]) -> ExtractOptions {
        ExtractOptions {
            exclude_types: self
                .exclude_types
                .iter()
                .chain(extra_excludes)
                .cloned()
                .collect(),
        }
    }
}

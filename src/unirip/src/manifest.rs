//! Persisted run result
//!
//! The manifest is the only contract with callers: `ok: true` with the asset
//! list and stats, or `ok: false` with an error message and trace.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::registry::Category;
use crate::stats::{aggregate, Stats};
use crate::Result;

/// One successfully exported object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    pub name: String,
    pub filename: String,
    #[serde(rename = "ext")]
    pub extension: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "emoji")]
    pub marker: String,
    pub unity_type: String,
    pub relative_path: String,
    pub size_bytes: u64,
    pub size: String,
    pub bundle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub ok: bool,
    #[serde(flatten)]
    pub result: RunResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunResult {
    Success { assets: Vec<AssetEntry>, stats: Stats },
    Failure { error: String, trace: String },
}

impl Manifest {
    /// Successful run; stats are computed from `assets`
    pub fn success(assets: Vec<AssetEntry>) -> Self {
        let stats = aggregate(&assets);
        Self {
            ok: true,
            result: RunResult::Success { assets, stats },
        }
    }

    /// Run that failed before producing a result
    pub fn failure(error: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: RunResult::Failure {
                error: error.into(),
                trace: trace.into(),
            },
        }
    }

    pub fn assets(&self) -> &[AssetEntry] {
        match &self.result {
            RunResult::Success { assets, .. } => assets.as_slice(),
            RunResult::Failure { .. } => &[],
        }
    }

    /// Write the manifest as JSON, creating parent directories
    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

//! Run summary computed from the exported entries

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::manifest::AssetEntry;
use crate::registry::Category;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub by_type: BTreeMap<Category, usize>,
    pub total_size: String,
    pub bundle_count: usize,
}

/// Recompute stats from scratch over `entries`
pub fn aggregate(entries: &[AssetEntry]) -> Stats {
    let mut by_type = BTreeMap::new();
    let mut bundles = BTreeSet::new();
    let mut total_bytes: u64 = 0;

    for entry in entries {
        *by_type.entry(entry.category).or_insert(0) += 1;
        bundles.insert(entry.bundle.as_str());
        total_bytes += entry.size_bytes;
    }

    Stats {
        total: entries.len(),
        by_type,
        total_size: format_size(total_bytes),
        bundle_count: bundles.len(),
    }
}

/// Human-readable size: `B` under 1 KiB, then `KB`/`MB` with one decimal
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

//! Extraction pipeline
//!
//! Visits every object of an [`AssetSource`] in order and classifies it as
//! skipped, failed or exported. A failure on one object never stops the run;
//! only problems outside the per-object loop (creating the output directory)
//! are returned as errors.

use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::AssetEntry;
use crate::name::{sanitize, NameRegistry};
use crate::registry::{self, TypeMeta};
use crate::source::{AssetSource, ObjectRecord, Payload};
use crate::stats::format_size;
use crate::{Error, Result};

/// Bundle name recorded when an object has no container identifier
pub const UNKNOWN_BUNDLE: &str = "unknown";

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Glob patterns over type tags; matching objects are skipped
    pub exclude_types: Vec<String>,
}

impl ExtractOptions {
    pub fn is_excluded(&self, type_tag: &str) -> bool {
        self.exclude_types
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, type_tag))
    }
}

/// Terminal state of one object
#[derive(Debug)]
pub enum Outcome {
    /// Type tag not exportable (or excluded)
    Skipped,
    /// Parse or export failed; no entry, no file
    Failed(Error),
    Exported(AssetEntry),
}

/// Summary of a finished run
#[derive(Debug, Default)]
pub struct Extraction {
    pub assets: Vec<AssetEntry>,
    pub skipped: usize,
    pub failed: usize,
}

/// Per-run extraction state: output root, options and the name table
pub struct Extractor<'a> {
    out_dir: PathBuf,
    options: &'a ExtractOptions,
    names: NameRegistry,
}

impl<'a> Extractor<'a> {
    pub fn new(out_dir: impl Into<PathBuf>, options: &'a ExtractOptions) -> Self {
        Self {
            out_dir: out_dir.into(),
            options,
            names: NameRegistry::new(),
        }
    }

    /// Process one object. Must be called in source order.
    pub fn process(&mut self, object: &dyn ObjectRecord) -> Outcome {
        let type_tag = object.type_tag();
        let Some(meta) = registry::lookup(type_tag) else {
            return Outcome::Skipped;
        };
        if self.options.is_excluded(type_tag) {
            return Outcome::Skipped;
        }

        let payload = match object.parse() {
            Ok(payload) => payload,
            Err(e) => return Outcome::Failed(e),
        };

        // The name is consumed here even if the export below fails
        let display = payload
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(type_tag);
        let name = self.names.resolve(&sanitize(Some(display)));

        match self.export(object, &payload, meta, &name) {
            Ok(entry) => Outcome::Exported(entry),
            Err(e) => Outcome::Failed(e),
        }
    }

    fn export(
        &self,
        object: &dyn ObjectRecord,
        payload: &Payload,
        meta: TypeMeta,
        name: &str,
    ) -> Result<AssetEntry> {
        let filename = format!("{}.{}", name, meta.extension);
        let relative_path = format!("{}/{}", meta.category, filename);

        let dir = self.out_dir.join(meta.category.as_str());
        fs::create_dir_all(&dir)?;
        let dest = dir.join(&filename);

        meta.category.strategy().export(object, payload, &dest)?;

        let size_bytes = fs::metadata(&dest)?.len();
        if size_bytes == 0 {
            fs::remove_file(&dest)?;
            return Err(Error::EmptyOutput);
        }

        Ok(AssetEntry {
            name: name.to_string(),
            filename,
            extension: meta.extension.to_string(),
            category: meta.category,
            marker: meta.marker.to_string(),
            unity_type: object.type_tag().to_string(),
            relative_path,
            size_bytes,
            size: format_size(size_bytes),
            bundle: object.container().unwrap_or(UNKNOWN_BUNDLE).to_string(),
        })
    }
}

/// Run the pipeline over every object in `source`
pub fn extract<S: AssetSource + ?Sized>(
    source: &S,
    out_dir: &Path,
    options: &ExtractOptions,
) -> Result<Extraction> {
    fs::create_dir_all(out_dir)?;

    let mut extractor = Extractor::new(out_dir, options);
    let mut extraction = Extraction::default();

    for object in source.objects() {
        match extractor.process(object) {
            Outcome::Skipped => {
                tracing::trace!("Skipping {} object", object.type_tag());
                extraction.skipped += 1;
            }
            Outcome::Failed(e) => {
                tracing::warn!("Failed to export {} object: {}", object.type_tag(), e);
                extraction.failed += 1;
            }
            Outcome::Exported(entry) => {
                tracing::debug!(
                    "{} {} ({})",
                    entry.marker,
                    entry.relative_path,
                    entry.size
                );
                extraction.assets.push(entry);
            }
        }
    }

    tracing::info!(
        "Extracted: {}, Failed: {}, Skipped: {}",
        extraction.assets.len(),
        extraction.failed,
        extraction.skipped
    );

    Ok(extraction)
}

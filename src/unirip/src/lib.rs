//! unirip - game asset extraction to files plus a JSON manifest
//!
//! Takes objects already decoded from an application archive (via an
//! [`AssetSource`]), classifies them by type tag, exports each recognized one
//! to `<out>/<category>/<name>.<ext>` and summarizes the run in a manifest.
//!
//! # Pipeline
//!
//! - [`registry`]: type tag -> category, extension, marker
//! - [`name`]: filesystem-safe names and per-run collision suffixes
//! - [`export`]: one export strategy per category family
//! - [`pipeline`]: per-object classify/parse/name/export with failure isolation
//! - [`stats`] and [`manifest`]: aggregation and the persisted result record
//!
//! Native archive decoding is not part of this crate. [`dump::DumpSource`]
//! reads object dumps produced by an external decoder.

pub mod dump;
pub mod export;
pub mod manifest;
pub mod name;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod stats;
pub mod tree;

pub use dump::DumpSource;
pub use export::Strategy;
pub use manifest::{AssetEntry, Manifest};
pub use name::{sanitize, NameRegistry};
pub use pipeline::{extract, ExtractOptions, Extraction, Extractor, Outcome};
pub use registry::{lookup, Category, TypeMeta};
pub use source::{AssetSource, Body, ObjectRecord, Payload, Sample, Script};
pub use stats::{aggregate, format_size, Stats};
pub use tree::Tree;

/// Errors from loading, parsing and exporting objects
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid base64 blob: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid byte blob: {0}")]
    InvalidBlob(String),

    #[error("Failed to open asset source {path}: {reason}")]
    SourceOpen { path: String, reason: String },

    #[error("Failed to parse {type_tag} object: {reason}")]
    Parse { type_tag: String, reason: String },

    #[error("Object has no decoded image")]
    MissingImage,

    #[error("No image format for extension '{0}'")]
    UnsupportedImageFormat(String),

    #[error("Object has no non-empty audio sample")]
    NoAudioSample,

    #[error("Object has no script payload")]
    MissingScript,

    #[error("Mesh array {field} is malformed: {reason}")]
    MalformedMesh { field: &'static str, reason: String },

    #[error("Payload shape '{found}' cannot be exported by the {strategy} strategy")]
    PayloadMismatch {
        strategy: &'static str,
        found: &'static str,
    },

    #[error("Export wrote zero bytes")]
    EmptyOutput,
}

pub type Result<T> = std::result::Result<T, Error>;

//! Export strategies, one per category family
//!
//! Every strategy writes exactly one file at the destination path chosen by
//! the pipeline and reports the number of bytes written. A failed or empty
//! export leaves no file behind.

mod audio;
mod mesh;
mod raster;
mod text;
mod typetree;

use std::fs;
use std::path::Path;

use crate::source::{ObjectRecord, Payload};
use crate::{Error, Result};

/// Closed set of export strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Decoded image surface encoded to a raster format
    Image,
    /// First non-empty audio sample, written verbatim
    Audio,
    /// Script payload as bytes or UTF-8 text
    RawText,
    /// Field tree as indented JSON
    Typetree,
    /// Vertex/index arrays as Wavefront OBJ text
    Geometry,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Image => "image",
            Strategy::Audio => "audio",
            Strategy::RawText => "raw-text",
            Strategy::Typetree => "typetree",
            Strategy::Geometry => "geometry",
        }
    }

    /// Export one object to `dest`, returning the number of bytes written
    pub fn export(&self, object: &dyn ObjectRecord, payload: &Payload, dest: &Path) -> Result<u64> {
        let result = match self {
            Strategy::Image => raster::export(payload, dest),
            Strategy::Audio => audio::export(payload, dest),
            Strategy::RawText => text::export(payload, dest),
            Strategy::Typetree => typetree::export(object, dest),
            Strategy::Geometry => mesh::export(object, payload, dest),
        };

        match result {
            Ok(0) => {
                discard(dest);
                Err(Error::EmptyOutput)
            }
            Ok(written) => Ok(written),
            Err(e) => {
                discard(dest);
                Err(e)
            }
        }
    }

    fn mismatch(&self, payload: &Payload) -> Error {
        Error::PayloadMismatch {
            strategy: self.as_str(),
            found: payload.body.kind(),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remove a partially written file; a missing file is fine
fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to remove partial output {}: {}", path.display(), e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::TestObject;
    use super::*;
    use crate::source::{Body, Sample, Script};
    use tempfile::TempDir;

    #[test]
    fn test_empty_output_is_failure() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Empty.txt");
        let object = TestObject::new("TextAsset", "Empty", Body::Script(Some(Script::Text(String::new()))));

        let result = Strategy::RawText.export(&object, &object.payload(), &dest);
        assert!(matches!(result, Err(Error::EmptyOutput)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_all_samples_empty() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Empty.wav");
        let object = TestObject::new(
            "AudioClip",
            "Empty",
            Body::Audio(vec![Sample {
                name: "a".into(),
                data: Vec::new(),
            }]),
        );

        let result = Strategy::Audio.export(&object, &object.payload(), &dest);
        assert!(matches!(result, Err(Error::NoAudioSample)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_failed_export_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Broken.obj");
        let tree = crate::tree::Tree::Map(vec![(
            "m_Vertices".into(),
            crate::tree::Tree::Array(vec![crate::tree::Tree::Float(1.0)]),
        )]);
        let object = TestObject::new("Mesh", "Broken", Body::Generic).with_tree(tree);

        let result = Strategy::Geometry.export(&object, &object.payload(), &dest);
        assert!(matches!(result, Err(Error::MalformedMesh { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn test_payload_mismatch() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("x.png");
        let object = TestObject::new("Texture2D", "x", Body::Generic);

        let result = Strategy::Image.export(&object, &object.payload(), &dest);
        assert!(matches!(
            result,
            Err(Error::PayloadMismatch {
                strategy: "image",
                found: "generic"
            })
        ));
    }
}

//! Asset source backed by JSON object dumps
//!
//! An external decoder writes the archive's objects as JSON:
//!
//! ```json
//! {"bundles": [{"name": "sharedassets0.assets", "objects": [
//!     {"type": "Texture2D", "fields": {"m_Name": "Icon",
//!         "image": {"width": 1, "height": 1, "rgba": {"$bytes": "/wAA/w=="}}}}
//! ]}]}
//! ```
//!
//! Byte blobs use `{"$bytes": "<base64>"}`. Typed fields per strategy:
//! - image: `image: {width, height, rgba}` (RGBA8, row-major)
//! - audio: `samples: {clip name: blob, ...}` in document order
//! - raw text: `m_Script` as a string or a blob
//!
//! Everything else is only reachable through the field tree.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::export::Strategy;
use crate::registry;
use crate::source::{AssetSource, Body, ObjectRecord, Payload, Sample, Script};
use crate::tree::Tree;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    bundles: Vec<Bundle>,
}

#[derive(Debug, Deserialize)]
struct Bundle {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    fields: Value,
}

/// One object from a dump document
#[derive(Debug, Clone)]
pub struct DumpObject {
    type_tag: String,
    container: Option<String>,
    fields: Value,
}

impl DumpObject {
    pub fn new(type_tag: impl Into<String>, container: Option<String>, fields: Value) -> Self {
        Self {
            type_tag: type_tag.into(),
            container,
            fields,
        }
    }

    fn parse_error(&self, reason: impl std::fmt::Display) -> Error {
        Error::Parse {
            type_tag: self.type_tag.clone(),
            reason: reason.to_string(),
        }
    }

    fn field_map(&self) -> Result<&Map<String, Value>> {
        self.fields
            .as_object()
            .ok_or_else(|| self.parse_error("fields must be an object"))
    }

    fn blob(&self, value: &Value) -> Result<Vec<u8>> {
        match Tree::from_json(value.clone()).map_err(|e| self.parse_error(e))? {
            Tree::Bytes(bytes) => Ok(bytes),
            other => Err(self.parse_error(format!("expected byte blob, got {}", other.kind()))),
        }
    }

    fn image(&self, fields: &Map<String, Value>) -> Result<Option<RgbaImage>> {
        let Some(image) = fields.get("image").filter(|v| !v.is_null()) else {
            return Ok(None);
        };

        let dimension = |key: &str| {
            image
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| self.parse_error(format!("image.{} missing or invalid", key)))
        };
        let width = dimension("width")?;
        let height = dimension("height")?;
        let rgba = image
            .get("rgba")
            .ok_or_else(|| self.parse_error("image.rgba missing"))
            .and_then(|v| self.blob(v))?;

        let len = rgba.len();
        RgbaImage::from_raw(width, height, rgba).map(Some).ok_or_else(|| {
            self.parse_error(format!(
                "image buffer of {} bytes does not match {}x{} RGBA",
                len, width, height
            ))
        })
    }

    fn samples(&self, fields: &Map<String, Value>) -> Result<Vec<Sample>> {
        let Some(samples) = fields.get("samples").filter(|v| !v.is_null()) else {
            return Ok(Vec::new());
        };
        let samples = samples
            .as_object()
            .ok_or_else(|| self.parse_error("samples must be an object"))?;

        samples
            .iter()
            .map(|(name, data)| {
                Ok(Sample {
                    name: name.clone(),
                    data: self.blob(data)?,
                })
            })
            .collect()
    }

    fn script(&self, fields: &Map<String, Value>) -> Result<Option<Script>> {
        match fields.get("m_Script") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(Script::Text(text.clone()))),
            Some(other) => Ok(Some(Script::Bytes(self.blob(other)?))),
        }
    }
}

impl ObjectRecord for DumpObject {
    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    fn parse(&self) -> Result<Payload> {
        let fields = self.field_map()?;
        let name = fields
            .get("m_Name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let strategy = registry::lookup(&self.type_tag).map(|meta| meta.category.strategy());
        let body = match strategy {
            Some(Strategy::Image) => Body::Image(self.image(fields)?),
            Some(Strategy::Audio) => Body::Audio(self.samples(fields)?),
            Some(Strategy::RawText) => Body::Script(self.script(fields)?),
            Some(Strategy::Typetree | Strategy::Geometry) | None => Body::Generic,
        };

        Ok(Payload { name, body })
    }

    fn typetree(&self) -> Result<Tree> {
        self.field_map()?;
        Tree::from_json(self.fields.clone()).map_err(|e| self.parse_error(e))
    }
}

/// Objects loaded from one dump file or a directory of dump files
#[derive(Debug)]
pub struct DumpSource {
    path: PathBuf,
    objects: Vec<DumpObject>,
}

impl DumpSource {
    /// Load a dump file, or every `*.json` file under a directory (sorted by path).
    /// Symlinks are followed; any entry that cannot be read fails the load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |reason: String| Error::SourceOpen {
            path: path.display().to_string(),
            reason,
        };

        if !path.exists() {
            return Err(open_error("path does not exist".to_string()));
        }

        let files: Vec<PathBuf> = if path.is_dir() {
            let mut files = Vec::new();
            for entry in walkdir::WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| open_error(e.to_string()))?;
                let is_json = entry
                    .path()
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case("json"))
                    .unwrap_or(false);
                if entry.file_type().is_file() && is_json {
                    files.push(entry.into_path());
                }
            }
            files
        } else {
            vec![path.to_path_buf()]
        };

        if files.is_empty() {
            return Err(open_error("no .json object dumps found".to_string()));
        }

        let mut objects = Vec::new();
        for file in &files {
            let data = fs::read_to_string(file)
                .map_err(|e| open_error(format!("{}: {}", file.display(), e)))?;
            let document: Document = serde_json::from_str(&replace_lone_surrogates(&data))
                .map_err(|e| open_error(format!("{}: {}", file.display(), e)))?;
            objects.extend(Self::flatten(document));
        }

        tracing::debug!(
            "Loaded {} objects from {} dump file(s)",
            objects.len(),
            files.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            objects,
        })
    }

    /// Parse a single dump document held in memory
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(&replace_lone_surrogates(json))?;
        Ok(Self {
            path: PathBuf::new(),
            objects: Self::flatten(document).collect(),
        })
    }

    fn flatten(document: Document) -> impl Iterator<Item = DumpObject> {
        document.bundles.into_iter().flat_map(|bundle| {
            let container = bundle.name;
            bundle
                .objects
                .into_iter()
                .map(move |raw| DumpObject::new(raw.type_tag, container.clone(), raw.fields))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Rewrite `\uXXXX` escapes of unpaired UTF-16 surrogates to U+FFFD.
///
/// Decoders that dump raw UTF-16 text emit them, and serde_json rejects the
/// whole document on the first one.
fn replace_lone_surrogates(json: &str) -> Cow<'_, str> {
    fn escape_at(bytes: &[u8], at: usize) -> Option<u16> {
        let digits = bytes.get(at..at + 6)?;
        if digits[0] != b'\\' || digits[1] != b'u' {
            return None;
        }
        let hex = std::str::from_utf8(&digits[2..]).ok()?;
        u16::from_str_radix(hex, 16).ok()
    }

    let bytes = json.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escape_at(bytes, i) else {
            // Any other escape, including an escaped backslash
            i += 2;
            continue;
        };
        match unit {
            0xD800..=0xDBFF if matches!(escape_at(bytes, i + 6), Some(0xDC00..=0xDFFF)) => {
                i += 12;
            }
            0xD800..=0xDFFF => {
                let out = out.get_or_insert_with(|| String::with_capacity(json.len()));
                out.push_str(&json[copied..i]);
                out.push_str("\\uFFFD");
                i += 6;
                copied = i;
            }
            _ => i += 6,
        }
    }

    match out {
        Some(mut out) => {
            out.push_str(&json[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(json),
    }
}

impl AssetSource for DumpSource {
    fn objects(&self) -> Box<dyn Iterator<Item = &dyn ObjectRecord> + '_> {
        Box::new(self.objects.iter().map(|o| o as &dyn ObjectRecord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn object(type_tag: &str, fields: Value) -> DumpObject {
        DumpObject::new(type_tag, Some("level0".to_string()), fields)
    }

    #[test]
    fn test_parse_image() {
        let obj = object(
            "Texture2D",
            json!({"m_Name": "Icon!", "image": {"width": 1, "height": 2, "rgba": {"$bytes": "/wAA/wD/AP8="}}}),
        );
        let payload = obj.parse().unwrap();
        assert_eq!(payload.name.as_deref(), Some("Icon!"));
        let Body::Image(Some(image)) = payload.body else {
            panic!("expected image body");
        };
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 1).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_parse_image_absent_and_mismatched() {
        let obj = object("Sprite", json!({"m_Name": "Empty"}));
        assert!(matches!(obj.parse().unwrap().body, Body::Image(None)));

        let obj = object(
            "Sprite",
            json!({"image": {"width": 4, "height": 4, "rgba": {"$bytes": "AAAA"}}}),
        );
        assert!(matches!(obj.parse(), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_parse_samples_in_order() {
        let obj = object(
            "AudioClip",
            json!({"m_Name": "Hit", "samples": {"z.wav": {"$bytes": ""}, "a.wav": {"$bytes": "UklGRg=="}}}),
        );
        let Body::Audio(samples) = obj.parse().unwrap().body else {
            panic!("expected audio body");
        };
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].name, "z.wav");
        assert!(samples[0].data.is_empty());
        assert_eq!(samples[1].data, b"RIFF");
    }

    #[test]
    fn test_parse_script_variants() {
        let text = object("TextAsset", json!({"m_Script": "hello"}));
        assert!(matches!(
            text.parse().unwrap().body,
            Body::Script(Some(Script::Text(ref s))) if s == "hello"
        ));

        let bytes = object("TextAsset", json!({"m_Script": {"$bytes": "AAE="}}));
        assert!(matches!(
            bytes.parse().unwrap().body,
            Body::Script(Some(Script::Bytes(ref b))) if b == &[0, 1]
        ));

        let missing = object("TextAsset", json!({}));
        assert!(matches!(missing.parse().unwrap().body, Body::Script(None)));

        let bad = object("TextAsset", json!({"m_Script": 12}));
        assert!(bad.parse().is_err());
    }

    #[test]
    fn test_parse_rejects_non_object_fields() {
        let obj = object("GameObject", json!([1, 2, 3]));
        assert!(matches!(obj.parse(), Err(Error::Parse { .. })));
        assert!(obj.typetree().is_err());
    }

    #[test]
    fn test_typetree_decodes_blobs() {
        let obj = object("Font", json!({"m_Name": "Sans", "m_FontData": {"$bytes": "AQI="}}));
        let tree = obj.typetree().unwrap();
        assert_eq!(tree.get("m_FontData"), Some(&Tree::Bytes(vec![1, 2])));
    }

    #[test]
    fn test_from_json_keeps_bundle_order() {
        let source = DumpSource::from_json(
            r#"{"bundles": [
                {"name": "a", "objects": [{"type": "Mesh"}, {"type": "Shader"}]},
                {"objects": [{"type": "Transform", "fields": {}}]}
            ]}"#,
        )
        .unwrap();

        let objects: Vec<_> = source.objects().collect();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0].type_tag(), "Mesh");
        assert_eq!(objects[0].container(), Some("a"));
        assert_eq!(objects[1].type_tag(), "Shader");
        assert_eq!(objects[2].container(), None);
    }

    #[test]
    fn test_lone_surrogate_stays_local() {
        let source = DumpSource::from_json(
            r#"{"bundles": [{"name": "level0", "objects": [
                {"type": "TextAsset", "fields": {"m_Name": "dialog", "m_Script": "a\ud800b"}},
                {"type": "Shader", "fields": {"m_Name": "Standard"}}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(source.len(), 2);

        let dir = TempDir::new().unwrap();
        let options = crate::pipeline::ExtractOptions::default();
        let extraction = crate::pipeline::extract(&source, dir.path(), &options).unwrap();
        assert_eq!(extraction.failed, 0);
        let paths: Vec<_> = extraction
            .assets
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(paths, ["text/dialog.txt", "shader/Standard.txt"]);

        let text = fs::read_to_string(dir.path().join("text/dialog.txt")).unwrap();
        assert_eq!(text, "a\u{FFFD}b");
    }

    #[test]
    fn test_surrogate_rewrite_keeps_valid_escapes() {
        let json = r#"{"pair": "\ud83d\ude00", "slash": "\\ud800", "tail": "\udc00"}"#;
        let rewritten = replace_lone_surrogates(json);
        assert_eq!(
            rewritten,
            r#"{"pair": "\ud83d\ude00", "slash": "\\ud800", "tail": "\uFFFD"}"#
        );

        let value: Value = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(value["pair"], "\u{1F600}");
        assert_eq!(value["slash"], "\\ud800");

        assert!(matches!(replace_lone_surrogates(r#"{"a": "\u00e9"}"#), Cow::Borrowed(_)));
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"bundles": [{"name": "b", "objects": [{"type": "Mesh", "fields": {}}]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("sub/a.json"),
            r#"{"bundles": [{"name": "a", "objects": [{"type": "Shader", "fields": {}}]}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = DumpSource::load(dir.path()).unwrap();
        assert_eq!(source.len(), 2);
        let containers: Vec<_> = source.objects().map(|o| o.container()).collect();
        assert_eq!(containers, [Some("b"), Some("a")]);
    }

    #[test]
    fn test_load_failures() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            DumpSource::load(dir.path().join("missing.apk")),
            Err(Error::SourceOpen { .. })
        ));
        assert!(matches!(DumpSource::load(dir.path()), Err(Error::SourceOpen { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        let err = DumpSource::load(&bad).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_directory_walk_error_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"bundles": [{"objects": [{"type": "Mesh", "fields": {}}]}]}"#,
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("b.json")).unwrap();

        let err = DumpSource::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::SourceOpen { .. }));
        assert!(err.to_string().contains("b.json"));
    }
}

//! Boundary to the archive decoder
//!
//! An [`AssetSource`] yields [`ObjectRecord`]s that are already decoded from
//! the archive's native encoding. Parsing is lazy: the pipeline only asks for
//! a payload or a field tree after the type tag has been recognized.

use image::RgbaImage;

use crate::tree::Tree;
use crate::Result;

/// Opened archive: an ordered sequence of object records
pub trait AssetSource {
    fn objects(&self) -> Box<dyn Iterator<Item = &dyn ObjectRecord> + '_>;
}

/// One decoded object from the archive
pub trait ObjectRecord {
    /// Native type name, e.g. `Texture2D`
    fn type_tag(&self) -> &str;

    /// Bundle or file the object came from
    fn container(&self) -> Option<&str>;

    /// Parse into the typed payload for this object's type
    fn parse(&self) -> Result<Payload>;

    /// Full field tree, for structured dumps and geometry
    fn typetree(&self) -> Result<Tree>;
}

/// Typed result of [`ObjectRecord::parse`]
#[derive(Debug, Clone)]
pub struct Payload {
    /// Display name (`m_Name`), if the object has one
    pub name: Option<String>,
    pub body: Body,
}

/// Type-specific data carried by a payload
#[derive(Debug, Clone)]
pub enum Body {
    /// Decoded image surface, if the texture could be decoded
    Image(Option<RgbaImage>),
    /// Named sample blobs in source order
    Audio(Vec<Sample>),
    /// Raw script/text payload
    Script(Option<Script>),
    /// No typed data; export works from the field tree
    Generic,
}

impl Body {
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Image(_) => "image",
            Body::Audio(_) => "audio",
            Body::Script(_) => "script",
            Body::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Bytes(Vec<u8>),
    Text(String),
}

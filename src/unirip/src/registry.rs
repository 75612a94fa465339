//! Static type table: type tag -> export category, extension and marker

use serde::{Deserialize, Serialize};

use crate::export::Strategy;

/// Coarse export family; also the output subdirectory name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Texture,
    Audio,
    Mesh,
    Text,
    Script,
    Font,
    Shader,
    Material,
    Anim,
    Prefab,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Texture => "texture",
            Category::Audio => "audio",
            Category::Mesh => "mesh",
            Category::Text => "text",
            Category::Script => "script",
            Category::Font => "font",
            Category::Shader => "shader",
            Category::Material => "material",
            Category::Anim => "anim",
            Category::Prefab => "prefab",
        }
    }

    /// Export strategy used for objects of this category
    pub fn strategy(&self) -> Strategy {
        match self {
            Category::Texture => Strategy::Image,
            Category::Audio => Strategy::Audio,
            Category::Text => Strategy::RawText,
            Category::Mesh => Strategy::Geometry,
            Category::Script
            | Category::Font
            | Category::Shader
            | Category::Material
            | Category::Anim
            | Category::Prefab => Strategy::Typetree,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export metadata for one recognized type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMeta {
    pub category: Category,
    pub extension: &'static str,
    pub marker: &'static str,
}

const fn meta(category: Category, extension: &'static str, marker: &'static str) -> TypeMeta {
    TypeMeta {
        category,
        extension,
        marker,
    }
}

/// All recognized type tags
pub const TYPES: &[(&str, TypeMeta)] = &[
    ("Texture2D", meta(Category::Texture, "png", "🖼")),
    ("Sprite", meta(Category::Texture, "png", "🖼")),
    ("AudioClip", meta(Category::Audio, "wav", "🔊")),
    ("Mesh", meta(Category::Mesh, "obj", "🧊")),
    ("TextAsset", meta(Category::Text, "txt", "📄")),
    ("MonoBehaviour", meta(Category::Script, "json", "📜")),
    ("Font", meta(Category::Font, "ttf", "🔤")),
    ("Shader", meta(Category::Shader, "txt", "✨")),
    ("Material", meta(Category::Material, "mat", "🎨")),
    ("AnimationClip", meta(Category::Anim, "anim", "🎬")),
    ("GameObject", meta(Category::Prefab, "json", "🧩")),
];

/// Look up export metadata for a type tag. Unlisted tags are not exportable.
pub fn lookup(type_tag: &str) -> Option<TypeMeta> {
    TYPES
        .iter()
        .find(|(tag, _)| *tag == type_tag)
        .map(|(_, meta)| *meta)
}

//! Generic key-value tree of an object's fields (the "typetree")

use base64::Engine;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{Error, Result};

/// Key used to mark a base64 byte blob inside JSON object dumps
pub const BYTES_KEY: &str = "$bytes";

/// Field tree. Map entries keep their source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Tree>),
    Map(Vec<(String, Tree)>),
}

impl Tree {
    /// Get a map field by key
    pub fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Tree::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Tree]> {
        match self {
            Tree::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Tree::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tree::Int(v) => Some(v as f64),
            Tree::UInt(v) => Some(v as f64),
            Tree::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Tree::Int(v) => u64::try_from(v).ok(),
            Tree::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// Name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Tree::Null => "null",
            Tree::Bool(_) => "bool",
            Tree::Int(_) | Tree::UInt(_) => "integer",
            Tree::Float(_) => "float",
            Tree::String(_) => "string",
            Tree::Bytes(_) => "bytes",
            Tree::Array(_) => "array",
            Tree::Map(_) => "map",
        }
    }

    /// Convert a JSON dump value, decoding `{"$bytes": "<base64>"}` blobs
    pub fn from_json(value: Value) -> Result<Tree> {
        Ok(match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Bool(b),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Tree::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Tree::UInt(v)
                } else {
                    Tree::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Tree::String(s),
            Value::Array(items) => Tree::Array(
                items
                    .into_iter()
                    .map(Tree::from_json)
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(encoded)) = map.get(BYTES_KEY) {
                        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
                        return Ok(Tree::Bytes(bytes));
                    }
                    if map.contains_key(BYTES_KEY) {
                        return Err(Error::InvalidBlob(format!(
                            "{} must be a base64 string",
                            BYTES_KEY
                        )));
                    }
                }
                Tree::Map(
                    map.into_iter()
                        .map(|(k, v)| Ok((k, Tree::from_json(v)?)))
                        .collect::<Result<_>>()?,
                )
            }
        })
    }
}

/// Leaves with no JSON representation (non-finite floats, byte blobs) are
/// written as strings.
impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Tree::Null => serializer.serialize_unit(),
            Tree::Bool(b) => serializer.serialize_bool(*b),
            Tree::Int(v) => serializer.serialize_i64(*v),
            Tree::UInt(v) => serializer.serialize_u64(*v),
            Tree::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Tree::Float(v) => serializer.collect_str(v),
            Tree::String(s) => serializer.serialize_str(s),
            Tree::Bytes(b) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(b))
            }
            Tree::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

//! Mesh export: flat vertex/index arrays as Wavefront OBJ text

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::source::{ObjectRecord, Payload};
use crate::tree::Tree;
use crate::{Error, Result};

const VERTICES_FIELD: &str = "m_Vertices";
const INDICES_FIELD: &str = "m_IndexBuffer";

pub(super) fn export(object: &dyn ObjectRecord, payload: &Payload, dest: &Path) -> Result<u64> {
    let tree = object.typetree()?;
    let vertices = flat_array(&tree, VERTICES_FIELD, Tree::as_f64)?;
    let faces = one_based(&flat_array(&tree, INDICES_FIELD, Tree::as_u64)?)?;

    let name = dest
        .file_stem()
        .and_then(|s| s.to_str())
        .or(payload.name.as_deref())
        .unwrap_or_else(|| object.type_tag());

    let mut writer = BufWriter::new(File::create(dest)?);
    writeln!(writer, "# Exported by unirip")?;
    writeln!(writer, "# Mesh: {}", name)?;
    // Debug formatting keeps the decimal point on whole coordinates
    for v in vertices.chunks_exact(3) {
        writeln!(writer, "v {:?} {:?} {:?}", v[0], v[1], v[2])?;
    }
    for f in faces.chunks_exact(3) {
        writeln!(writer, "f {} {} {}", f[0], f[1], f[2])?;
    }
    writer.flush()?;
    drop(writer);

    Ok(fs::metadata(dest)?.len())
}

/// OBJ face indices count from 1
fn one_based(indices: &[u64]) -> Result<Vec<u64>> {
    indices
        .iter()
        .enumerate()
        .map(|(i, index)| {
            index.checked_add(1).ok_or_else(|| Error::MalformedMesh {
                field: INDICES_FIELD,
                reason: format!("element {} ({}) is out of range", i, index),
            })
        })
        .collect()
}

/// Read a flat numeric array whose length is a multiple of three.
/// A missing field is an empty array.
fn flat_array<T>(
    tree: &Tree,
    field: &'static str,
    convert: fn(&Tree) -> Option<T>,
) -> Result<Vec<T>> {
    let Some(value) = tree.get(field) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| Error::MalformedMesh {
        field,
        reason: format!("expected array, got {}", value.kind()),
    })?;

    if items.len() % 3 != 0 {
        return Err(Error::MalformedMesh {
            field,
            reason: format!("length {} is not a multiple of 3", items.len()),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            convert(item).ok_or_else(|| Error::MalformedMesh {
                field,
                reason: format!("element {} is {}", i, item.kind()),
            })
        })
        .collect()
}

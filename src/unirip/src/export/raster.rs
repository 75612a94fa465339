//! Texture/sprite export: decoded surface -> raster file

use std::fs;
use std::path::Path;

use image::ImageFormat;

use super::Strategy;
use crate::source::{Body, Payload};
use crate::{Error, Result};

/// Encode the payload's image in the format named by the destination extension
pub(super) fn export(payload: &Payload, dest: &Path) -> Result<u64> {
    let Body::Image(surface) = &payload.body else {
        return Err(Strategy::Image.mismatch(payload));
    };
    let image = surface.as_ref().ok_or(Error::MissingImage)?;

    let ext = dest
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| Error::UnsupportedImageFormat(ext.to_string()))?;

    image.save_with_format(dest, format)?;
    Ok(fs::metadata(dest)?.len())
}

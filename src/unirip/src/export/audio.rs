//! Audio export: first non-empty sample blob, written verbatim

use std::fs;
use std::path::Path;

use super::Strategy;
use crate::source::{Body, Payload};
use crate::{Error, Result};

pub(super) fn export(payload: &Payload, dest: &Path) -> Result<u64> {
    let Body::Audio(samples) = &payload.body else {
        return Err(Strategy::Audio.mismatch(payload));
    };

    let sample = samples
        .iter()
        .find(|s| !s.data.is_empty())
        .ok_or(Error::NoAudioSample)?;

    tracing::trace!("Writing sample '{}' ({} bytes)", sample.name, sample.data.len());
    fs::write(dest, &sample.data)?;
    Ok(sample.data.len() as u64)
}

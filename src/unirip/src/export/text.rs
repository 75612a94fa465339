//! Text asset export: raw script payload

use std::fs;
use std::path::Path;

use super::Strategy;
use crate::source::{Body, Payload, Script};
use crate::{Error, Result};

/// Byte payloads are written as-is, character payloads as UTF-8
pub(super) fn export(payload: &Payload, dest: &Path) -> Result<u64> {
    let Body::Script(script) = &payload.body else {
        return Err(Strategy::RawText.mismatch(payload));
    };

    let bytes = match script.as_ref().ok_or(Error::MissingScript)? {
        Script::Bytes(bytes) => bytes.as_slice(),
        Script::Text(text) => text.as_bytes(),
    };

    fs::write(dest, bytes)?;
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload(script: Option<Script>) -> Payload {
        Payload {
            name: Some("dialog".into()),
            body: Body::Script(script),
        }
    }

    #[test]
    fn test_bytes_written_verbatim() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dialog.txt");
        let raw = vec![0xff, 0xfe, 0x00, 0x41];

        assert_eq!(export(&payload(Some(Script::Bytes(raw.clone()))), &dest).unwrap(), 4);
        assert_eq!(fs::read(&dest).unwrap(), raw);
    }

    #[test]
    fn test_text_written_as_utf8() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dialog.txt");

        let written = export(&payload(Some(Script::Text("こんにちは".into()))), &dest).unwrap();
        assert_eq!(written, 15);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "こんにちは");
    }

    #[test]
    fn test_missing_script() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dialog.txt");
        assert!(matches!(export(&payload(None), &dest), Err(Error::MissingScript)));
    }
}

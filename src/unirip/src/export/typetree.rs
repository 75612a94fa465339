//! Structured dump: the object's field tree as indented JSON

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::source::ObjectRecord;
use crate::Result;

pub(super) fn export(object: &dyn ObjectRecord, dest: &Path) -> Result<u64> {
    let tree = object.typetree()?;

    let mut writer = BufWriter::new(File::create(dest)?);
    serde_json::to_writer_pretty(&mut writer, &tree)?;
    writer.flush()?;
    drop(writer);

    Ok(fs::metadata(dest)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::TestObject;
    use crate::source::Body;
    use crate::tree::Tree;
    use tempfile::TempDir;

    #[test]
    fn test_dump_is_indented_utf8() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Player.json");
        let tree = Tree::Map(vec![
            ("m_Name".into(), Tree::String("プレイヤー".into())),
            ("m_Speed".into(), Tree::Float(f64::NAN)),
            ("m_Enabled".into(), Tree::Int(1)),
        ]);
        let object = TestObject::new("MonoBehaviour", "Player", Body::Generic).with_tree(tree);

        let written = export(&object, &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert_eq!(written, text.len() as u64);
        assert_eq!(
            text,
            "{\n  \"m_Name\": \"プレイヤー\",\n  \"m_Speed\": \"NaN\",\n  \"m_Enabled\": 1\n}"
        );
    }

    #[test]
    fn test_typetree_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Broken.json");
        let object = TestObject::broken("GameObject");

        assert!(export(&object, &dest).is_err());
        assert!(!dest.exists());
    }
}

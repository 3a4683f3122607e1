//! JSON persistence for level records and snapshots.

use std::fs;
use std::io;
use std::path::Path;

use mazegen_core::{LevelRecord, LevelSnapshot};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub trait JsonFile: Serialize + DeserializeOwned {
    /// Writes through a sibling `.tmp` file and renames it into place.
    fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl JsonFile for LevelRecord {}

impl JsonFile for LevelSnapshot {}

#[cfg(test)]
mod tests {
    use super::*;
    use mazegen_core::{Algorithm, generate_level};
    use tempfile::tempdir;

    #[test]
    fn record_atomic_write_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("levels").join("level.json");
        let record = generate_level(11, Algorithm::BinaryTree, 6, 9)
            .expect("generate")
            .record()
            .expect("record");

        record.write_atomic(&path).expect("write");
        let loaded = LevelRecord::load(&path).expect("load");
        assert_eq!(record, loaded);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn snapshot_survives_disk_and_still_matches_its_record() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        let snapshot = generate_level(12, Algorithm::RecursiveDivision, 5, 5)
            .expect("generate")
            .snapshot()
            .expect("snapshot");

        snapshot.write_atomic(&path).expect("write");
        let loaded = LevelSnapshot::load(&path).expect("load");
        assert_eq!(loaded.matches_record(), Ok(true));
    }

    #[test]
    fn malformed_json_is_invalid_data() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"seed\": ").expect("write");
        let err = LevelRecord::load(&path).expect_err("broken record should fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Restart Stores
// ─────────────────────────────────────────────────────────────────────
//! Checkpoint storage for `RestartRecord`s, keyed by object name.
//!
//! The host normally supplies its own store; the two implementations
//! here cover in-process checkpoints and plain JSON files.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use undulate_types::{KinematicsError, KinematicsResult, RestartRecord};

/// Named checkpoint storage.
pub trait RestartStore: Send + Sync {
    fn put_record(&self, name: &str, record: &RestartRecord) -> KinematicsResult<()>;

    /// `Ok(None)` when no record exists under `name`.
    fn get_record(&self, name: &str) -> KinematicsResult<Option<RestartRecord>>;
}

fn encode(name: &str, record: &RestartRecord) -> KinematicsResult<String> {
    serde_json::to_string_pretty(record)
        .map_err(|e| KinematicsError::Restart(format!("{name}: cannot encode record: {e}")))
}

fn decode(name: &str, json: &str) -> KinematicsResult<RestartRecord> {
    serde_json::from_str(json)
        .map_err(|e| KinematicsError::Restart(format!("{name}: corrupt record: {e}")))
}

/// Records kept as JSON documents in memory.
#[derive(Default)]
pub struct InMemoryRestartStore {
    records: Mutex<HashMap<String, String>>,
}

impl InMemoryRestartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.lock().contains_key(name)
    }

    /// Raw JSON of a record, as written.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.records.lock().get(name).cloned()
    }

    pub fn insert_raw(&self, name: impl Into<String>, json: impl Into<String>) {
        self.records.lock().insert(name.into(), json.into());
    }
}

impl RestartStore for InMemoryRestartStore {
    fn put_record(&self, name: &str, record: &RestartRecord) -> KinematicsResult<()> {
        let json = encode(name, record)?;
        self.records.lock().insert(name.to_string(), json);
        Ok(())
    }

    fn get_record(&self, name: &str) -> KinematicsResult<Option<RestartRecord>> {
        match self.records.lock().get(name) {
            Some(json) => decode(name, json).map(Some),
            None => Ok(None),
        }
    }
}

/// One `<name>.json` file per record inside a directory.
pub struct JsonFileRestartStore {
    dir: PathBuf,
}

impl JsonFileRestartStore {
    /// Creates the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> KinematicsResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl RestartStore for JsonFileRestartStore {
    fn put_record(&self, name: &str, record: &RestartRecord) -> KinematicsResult<()> {
        let json = encode(name, record)?;
        fs::write(self.path_for(name), json)?;
        Ok(())
    }

    fn get_record(&self, name: &str) -> KinematicsResult<Option<RestartRecord>> {
        match fs::read_to_string(self.path_for(name)) {
            Ok(json) => decode(name, &json).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undulate_types::RigidFrame;

    fn sample() -> RestartRecord {
        RestartRecord::new(
            1.25,
            &RigidFrame::new([0.0, 0.0, 0.3], [0.5, 0.01, 0.0], [1.0, 0.02, 0.0]),
        )
    }

    #[test]
    fn test_in_memory_roundtrip() {
        let store = InMemoryRestartStore::new();
        store.put_record("foil", &sample()).unwrap();
        assert!(store.contains("foil"));
        assert_eq!(store.get_record("foil").unwrap(), Some(sample()));
        assert_eq!(store.get_record("other").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record() {
        let store = InMemoryRestartStore::new();
        store.insert_raw("foil", "{\"current_time\": \"soon\"}");
        assert!(matches!(store.get_record("foil"), Err(KinematicsError::Restart(_))));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("undulate-restart-{}", std::process::id()));
        let store = JsonFileRestartStore::open(&dir).unwrap();
        store.put_record("foil_a", &sample()).unwrap();
        assert_eq!(store.get_record("foil_a").unwrap(), Some(sample()));
        assert_eq!(store.get_record("missing").unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }
}

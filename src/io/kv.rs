use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for key/value persistence operations
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("could not open store directory {path}: {source}")]
    OpenDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read key {key}: {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },
    #[error("could not write key {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },
    #[error("could not remove key {key}: {source}")]
    Remove {
        key: String,
        source: std::io::Error,
    },
}

/// The persistent key/value facility the store writes through to.
/// Values are opaque text; a missing key is `Ok(None)`, never an error.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;
    fn remove(&mut self, key: &str) -> Result<(), KvError>;
}

/// Directory-backed store: one file per key. Writes go through a temp file
/// persisted over the target, so a crash mid-write never leaves a torn
/// value behind.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| KvError::OpenDir {
            path: dir.clone(),
            source: e,
        })?;
        Ok(DirStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KvStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        let write_err = |e: std::io::Error| KvError::Write {
            key: key.to_string(),
            source: e,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(value.as_bytes()).map_err(write_err)?;
        tmp.persist(self.key_path(key)).map_err(|e| KvError::Write {
            key: key.to_string(),
            source: e.error,
        })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::Remove {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Direct read access, for asserting on persisted state in tests
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_store_set_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("tasks").unwrap(), None);
        store.set("tasks", "[1,2,3]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1,2,3]"));

        // Full replace on every set
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn dir_store_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        store.set("userName", "Ana").unwrap();
        store.remove("userName").unwrap();
        assert_eq!(store.get("userName").unwrap(), None);
        // Removing a missing key is fine
        store.remove("userName").unwrap();
    }

    #[test]
    fn dir_store_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.value("k"), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}

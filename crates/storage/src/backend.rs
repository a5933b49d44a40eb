//! Key-value backends.
//!
//! A backend stores one JSON document per key. The filesystem backend is the
//! durable one; the in-memory backend serves tests and sessions that have no
//! usable data directory.

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Raw string-in, string-out persistence. Object safe so the typed facade
/// can hold any backend behind one pointer.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored document, or `None` if the key has never been
    /// written (or was removed).
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    fn write(&self, key: &str, json: &str) -> StorageResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// One `<key>.json` file per key under a data directory.
pub struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    /// Opens the backend, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    /// Writes through a temp file and an atomic rename, so a crash mid-write
    /// leaves the previous document intact rather than a truncated one.
    fn write(&self, key: &str, json: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::Write {
            path: path.clone(),
            source: e,
        })?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| StorageError::Write {
                path: path.clone(),
                source: e,
            })?;
        temp.persist(&path).map_err(|e| StorageError::Write {
            path,
            source: e.error,
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Remove { path, source: e }),
        }
    }
}

/// Volatile backend for tests and degraded sessions.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, json: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_read_missing_key_is_none() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FsBackend::new(dir.path()).expect("Should open backend");
        assert!(backend.read("audio").expect("Should read").is_none());
    }

    #[test]
    fn test_fs_write_then_read() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FsBackend::new(dir.path()).expect("Should open backend");

        backend.write("theme", "\"dark\"").expect("Should write");
        assert_eq!(
            backend.read("theme").expect("Should read").as_deref(),
            Some("\"dark\"")
        );
        assert!(dir.path().join("theme.json").exists());
    }

    #[test]
    fn test_fs_write_replaces_previous_document() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FsBackend::new(dir.path()).expect("Should open backend");

        backend.write("theme", "\"dark\"").expect("Should write");
        backend.write("theme", "\"light\"").expect("Should overwrite");
        assert_eq!(
            backend.read("theme").expect("Should read").as_deref(),
            Some("\"light\"")
        );
    }

    #[test]
    fn test_fs_remove_is_idempotent() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let backend = FsBackend::new(dir.path()).expect("Should open backend");

        backend.write("settings", "{}").expect("Should write");
        backend.remove("settings").expect("Should remove");
        backend.remove("settings").expect("Removing again is fine");
        assert!(backend.read("settings").expect("Should read").is_none());
    }

    #[test]
    fn test_fs_new_creates_nested_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let nested = dir.path().join("a").join("b");
        let backend = FsBackend::new(&nested).expect("Should create directories");
        backend.write("audio", "{}").expect("Should write");
        assert!(nested.join("audio.json").exists());
    }

    #[test]
    fn test_memory_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.read("bookmarks").expect("Should read").is_none());
        backend.write("bookmarks", "[]").expect("Should write");
        assert_eq!(
            backend.read("bookmarks").expect("Should read").as_deref(),
            Some("[]")
        );
        backend.remove("bookmarks").expect("Should remove");
        assert!(backend.read("bookmarks").expect("Should read").is_none());
    }
}

//! Durable persistence for session state.
//!
//! Session stores hand their state here as small JSON documents, one per
//! key. The design goals:
//!
//! - **Graceful degradation**: a missing, corrupt or unreadable document
//!   yields the caller's default with a warning, never an error the reading
//!   path has to handle
//! - **Atomic writes**: documents are replaced via temp file + rename and
//!   are never left half-written
//! - **Coalesced writes**: mutations funnel through a [`Debouncer`] so a
//!   burst of changes costs one write
//!
//! # Example
//!
//! ```no_run
//! use mushaf_storage::Storage;
//!
//! let storage = Storage::open_default();
//! let theme: String = storage.load("theme", "light".to_string());
//! storage.save("theme", &"dark".to_string());
//! ```

mod backend;
mod debounce;
mod error;

pub use backend::{FsBackend, MemoryBackend, StorageBackend};
pub use debounce::Debouncer;
pub use error::{StorageError, StorageResult};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Typed facade over a key-value backend.
///
/// Cheap to clone; clones share the backend. Load and save never propagate
/// backend failures: a session must keep working with in-memory state even
/// when the disk misbehaves, so problems are logged and defaults take over.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Opens durable storage under the platform data directory, falling
    /// back to an in-memory backend (with a warning) when none is usable.
    pub fn open_default() -> Self {
        match Self::default_data_dir().and_then(FsBackend::new) {
            Ok(backend) => Self::new(backend),
            Err(e) => {
                log::warn!("No durable data directory ({e}); state will not survive this session");
                Self::memory()
            }
        }
    }

    /// Opens durable storage rooted at an explicit directory.
    pub fn open_at(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self::new(FsBackend::new(dir)?))
    }

    /// Volatile storage for tests and degraded sessions.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// The platform data directory for this application.
    ///
    /// Follows the XDG base directory spec on Linux
    /// (`~/.local/share/mushaf/`), with the macOS and Windows equivalents.
    pub fn default_data_dir() -> StorageResult<PathBuf> {
        ProjectDirs::from("", "", "mushaf")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDir)
    }

    /// Reads and deserializes the document under `key`. An absent key,
    /// unreadable file or corrupt document all yield `default`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                log::warn!("Failed to read '{key}': {e}; using defaults");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding corrupt document under '{key}': {e}");
                default
            }
        }
    }

    /// Serializes and writes `value` under `key`. Failures are logged, not
    /// returned; the in-memory state stays authoritative either way.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize '{key}': {e}; skipping save");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &json) {
            log::warn!("Failed to persist '{key}': {e}");
        }
    }

    /// Removes the document under `key`, logging failures.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            log::warn!("Failed to remove '{key}': {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        volume: f32,
        reciter: String,
    }

    fn sample_prefs() -> Prefs {
        Prefs {
            volume: 0.8,
            reciter: "1".to_string(),
        }
    }

    #[test]
    fn test_load_missing_key_returns_default() {
        let storage = Storage::memory();
        let loaded = storage.load("audio", sample_prefs());
        assert_eq!(loaded, sample_prefs());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::open_at(dir.path()).expect("Should open storage");

        let prefs = Prefs {
            volume: 0.25,
            reciter: "3".to_string(),
        };
        storage.save("audio", &prefs);
        let loaded = storage.load("audio", sample_prefs());
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_corrupt_document_yields_default() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("audio.json"), "{not json at all")
            .expect("Should write corrupt file");

        let storage = Storage::open_at(dir.path()).expect("Should open storage");
        let loaded = storage.load("audio", sample_prefs());
        assert_eq!(loaded, sample_prefs());
    }

    #[test]
    fn test_wrong_shape_yields_default() {
        let storage = Storage::memory();
        storage.save("audio", &vec![1, 2, 3]);
        let loaded = storage.load("audio", sample_prefs());
        assert_eq!(loaded, sample_prefs());
    }

    #[test]
    fn test_remove_then_load_returns_default() {
        let storage = Storage::memory();
        storage.save("theme", &"dark".to_string());
        storage.remove("theme");
        assert_eq!(storage.load("theme", "light".to_string()), "light");
    }

    #[test]
    fn test_clones_share_the_backend() {
        let storage = Storage::memory();
        let clone = storage.clone();
        clone.save("theme", &"dark".to_string());
        assert_eq!(storage.load("theme", "light".to_string()), "dark");
    }

    #[test]
    fn test_documents_survive_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        {
            let storage = Storage::open_at(dir.path()).expect("Should open storage");
            storage.save("settings", &sample_prefs());
        }
        let storage = Storage::open_at(dir.path()).expect("Should reopen storage");
        assert_eq!(
            storage.load(
                "settings",
                Prefs {
                    volume: 0.0,
                    reciter: String::new()
                }
            ),
            sample_prefs()
        );
    }
}

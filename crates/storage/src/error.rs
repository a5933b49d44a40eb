//! Error types for the storage layer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a key's file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a key's file
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to remove a key's file
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the data directory
    #[error("Failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The platform reports no home, so no durable directory exists
    #[error("Could not determine a user data directory")]
    NoDataDir,

    /// In-memory backend's lock was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

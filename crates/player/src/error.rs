//! Error types for the playback layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    /// A device rejected a command outright
    #[error("Device command failed: {0}")]
    Device(String),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

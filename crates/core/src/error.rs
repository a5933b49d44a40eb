//! Error types for the domain model.

use thiserror::Error;

/// Failure to parse a canonical `"chapter:verse"` key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerseKeyError {
    /// The string is not of the form `chapter:verse`.
    #[error("verse key must be \"chapter:verse\", got {0:?}")]
    Malformed(String),

    /// A component was present but not a valid number.
    #[error("verse key component {0:?} is not a number")]
    NotANumber(String),

    /// Chapter and verse numbers start at 1.
    #[error("verse key components must be non-zero, got {0:?}")]
    Zero(String),
}

//! Verse identity.

use crate::error::VerseKeyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of chapters (surahs) in the corpus.
pub const CHAPTER_COUNT: u16 = 114;

/// Total number of verses across all chapters, used for completion
/// percentages.
pub const TOTAL_VERSE_COUNT: u32 = 6236;

/// Canonical identifier of a single verse, `"chapter:verse"` (e.g. `"2:255"`).
///
/// This is the deduplication key for bookmarks and the membership key for
/// reading progress, and it serializes as the canonical string so persisted
/// JSON stays human-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VerseKey {
    chapter: u16,
    verse: u16,
}

impl VerseKey {
    /// Builds a key from raw numbers. Zero components are representable
    /// here; actions that accept user input guard against them before
    /// constructing a key.
    pub fn new(chapter: u16, verse: u16) -> Self {
        Self { chapter, verse }
    }

    pub fn chapter(&self) -> u16 {
        self.chapter
    }

    pub fn verse(&self) -> u16 {
        self.verse
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for VerseKey {
    type Err = VerseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chapter, verse) = s
            .split_once(':')
            .ok_or_else(|| VerseKeyError::Malformed(s.to_string()))?;
        let chapter: u16 = chapter
            .parse()
            .map_err(|_| VerseKeyError::NotANumber(chapter.to_string()))?;
        let verse: u16 = verse
            .parse()
            .map_err(|_| VerseKeyError::NotANumber(verse.to_string()))?;
        if chapter == 0 || verse == 0 {
            return Err(VerseKeyError::Zero(s.to_string()));
        }
        Ok(Self { chapter, verse })
    }
}

impl From<VerseKey> for String {
    fn from(key: VerseKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for VerseKey {
    type Error = VerseKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

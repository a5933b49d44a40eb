//! Bookmark domain model.

use crate::types::common::Timestamp;
use crate::types::verse::VerseKey;
use serde::{Deserialize, Serialize};

/// A saved verse. At most one bookmark exists per verse key; the bookmark
/// store enforces that on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub chapter: u16,
    pub verse: u16,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_text: Option<String>,
}

impl Bookmark {
    /// Stamps a pending bookmark with the current time.
    pub fn new(new: NewBookmark) -> Self {
        Self {
            chapter: new.chapter,
            verse: new.verse,
            created_at: Timestamp::now(),
            chapter_name: new.chapter_name,
            verse_text: new.verse_text,
        }
    }

    /// The identity this bookmark is deduplicated on.
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

/// A bookmark as supplied by the caller, before the store stamps it with a
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub chapter: u16,
    pub verse: u16,
    pub chapter_name: Option<String>,
    pub verse_text: Option<String>,
}

impl NewBookmark {
    pub fn new(chapter: u16, verse: u16) -> Self {
        Self {
            chapter,
            verse,
            chapter_name: None,
            verse_text: None,
        }
    }

    /// Attaches the chapter's display name.
    pub fn with_chapter_name(mut self, name: impl Into<String>) -> Self {
        self.chapter_name = Some(name.into());
        self
    }

    /// Attaches a snippet of the verse text for list rendering.
    pub fn with_verse_text(mut self, text: impl Into<String>) -> Self {
        self.verse_text = Some(text.into());
        self
    }

    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

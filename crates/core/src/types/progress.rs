//! Reading progress: the read set, last-read pointer and daily streak.

use crate::types::common::Timestamp;
use crate::types::verse::{VerseKey, TOTAL_VERSE_COUNT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Bound;

/// The most recently read verse, kept so the reader can resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRead {
    pub chapter: u16,
    pub verse: u16,
    pub chapter_name: String,
    pub timestamp: Timestamp,
}

impl LastRead {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

/// State of the progress store.
///
/// `streak_days > 0` implies `last_read_date` is set; the marking action
/// updates both together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub read_verses: BTreeSet<VerseKey>,
    pub last_read: Option<LastRead>,
    pub streak_days: u32,
    pub last_read_date: Option<NaiveDate>,
}

impl ProgressState {
    pub fn verses_read(&self) -> usize {
        self.read_verses.len()
    }

    pub fn is_verse_read(&self, key: &VerseKey) -> bool {
        self.read_verses.contains(key)
    }

    /// Share of the whole corpus read, in percent.
    pub fn completion_percent(&self) -> f32 {
        (self.read_verses.len() as f32 / TOTAL_VERSE_COUNT as f32) * 100.0
    }

    /// Number of read verses within one chapter. Keys order chapter-major,
    /// so this is a contiguous range of the set.
    pub fn read_in_chapter(&self, chapter: u16) -> usize {
        let lo = Bound::Included(VerseKey::new(chapter, 1));
        let hi = Bound::Included(VerseKey::new(chapter, u16::MAX));
        self.read_verses.range((lo, hi)).count()
    }
}

/// Streak value after a read on `today`.
///
/// First read ever starts at 1. A repeat read on the same day leaves the
/// streak alone, the next day extends it, and any longer gap resets to 1.
/// The gap is measured in whole days between the two dates' midnights, which
/// matches a ceiling over the raw millisecond difference since both sides
/// are midnight-aligned.
pub fn advance_streak(streak_days: u32, last_read_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = last_read_date else {
        return 1;
    };
    match today.signed_duration_since(last).num_days().unsigned_abs() {
        0 => streak_days,
        1 => streak_days + 1,
        _ => 1,
    }
}

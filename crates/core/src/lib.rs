//! Shared domain model for the mushaf reading client.
//!
//! Everything in here is plain data: verse identifiers, the state value
//! types held by the session stores, and the handful of corpus constants.
//! Behavior (actions, persistence, playback) lives in the other crates.

pub mod error;
pub mod types;

pub use error::VerseKeyError;
pub use types::{
    advance_streak, ArabicFont, AudioPrefs, AudioState, Bookmark, FontSize, Language, LastRead,
    NewBookmark, PlaybackPhase, ProgressState, RepeatMode, SettingsState, Theme, Timestamp,
    VerseKey, CHAPTER_COUNT, DEFAULT_RECITER_ID, TOTAL_VERSE_COUNT,
};

//! Domain types for the mushaf client, organized by store:
//! - `verse`: verse identity and corpus constants
//! - `audio`: playback state and the persisted preference projection
//! - `bookmark`: saved verses
//! - `progress`: read set, last-read pointer, streak
//! - `settings`: display and playback preferences
//! - `theme`: light/dark selection
//! - `common`: shared helpers (timestamps)

mod audio;
mod bookmark;
mod common;
mod progress;
mod settings;
mod theme;
mod verse;

pub use audio::{AudioPrefs, AudioState, PlaybackPhase, RepeatMode, DEFAULT_RECITER_ID};
pub use bookmark::{Bookmark, NewBookmark};
pub use common::Timestamp;
pub use progress::{advance_streak, LastRead, ProgressState};
pub use settings::{ArabicFont, FontSize, Language, SettingsState};
pub use theme::Theme;
pub use verse::{VerseKey, CHAPTER_COUNT, TOTAL_VERSE_COUNT};

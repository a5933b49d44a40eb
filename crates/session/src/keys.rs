//! Storage keys for the five persisted stores.
//!
//! Keys are bare names; the app-specific data directory provides the
//! namespace, so there is no `quran-app-` style prefix to collide on.

pub const AUDIO: &str = "audio";
pub const BOOKMARKS: &str = "bookmarks";
pub const PROGRESS: &str = "progress";
pub const SETTINGS: &str = "settings";
pub const THEME: &str = "theme";

//! Reactive session layer for the mushaf client.
//!
//! The client's state lives in five observable stores (audio, bookmarks,
//! progress, settings, theme), each mutated only through named actions and
//! each broadcast synchronously to subscribers. A [`Session`] builds the
//! stores from persisted state and keeps them persisted through debounced
//! writes.
//!
//! # Architecture
//!
//! - **Single-threaded**: stores are `!Send`; all mutation and notification
//!   happens on the session thread, no locks
//! - **Whole-value state**: actions compute a new state value and replace
//!   the old one, so subscribers never see a half-applied change
//! - **Write-behind persistence**: every mutation schedules a debounced
//!   save; a burst of changes lands as one write with the final value
//!
//! # Example
//!
//! ```
//! use mushaf_session::Session;
//! use mushaf_storage::Storage;
//!
//! let session = Session::open(Storage::memory());
//! session.bookmarks().add(mushaf_core::NewBookmark::new(2, 255));
//! assert_eq!(session.bookmarks().count(), 1);
//! session.flush();
//! ```

mod audio;
mod bookmarks;
pub mod keys;
mod progress;
mod session;
mod settings;
mod store;
mod theme;

pub use audio::AudioStore;
pub use bookmarks::{BookmarkStore, BookmarksState};
pub use progress::ProgressStore;
pub use session::{Session, SessionOptions};
pub use settings::SettingsStore;
pub use store::{Store, Subscription};
pub use theme::ThemeStore;

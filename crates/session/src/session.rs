//! Session composition root.
//!
//! Builds the five stores from persisted state and wires each one to a
//! debounced persistence listener. Everything a consumer needs comes from
//! here; the stores are never globals.

use crate::audio::AudioStore;
use crate::bookmarks::{BookmarkStore, BookmarksState};
use crate::keys;
use crate::progress::ProgressStore;
use crate::settings::SettingsStore;
use crate::store::Subscription;
use crate::theme::ThemeStore;
use mushaf_core::{AudioPrefs, AudioState, Bookmark, ProgressState, SettingsState, Theme};
use mushaf_storage::{Debouncer, Storage};
use std::rc::Rc;
use std::time::Duration;

/// Tuning knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Quiet window between a store mutation and its persistence write.
    pub save_debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            save_debounce: Duration::from_millis(500),
        }
    }
}

/// One user session: five observable stores, auto-persisted.
///
/// Single-threaded by design (the stores are `!Send`); the only background
/// work is the debounce workers, which receive plain values over channels.
/// Dropping the session flushes pending writes.
pub struct Session {
    audio: Rc<AudioStore>,
    bookmarks: Rc<BookmarkStore>,
    progress: Rc<ProgressStore>,
    settings: Rc<SettingsStore>,
    theme: Rc<ThemeStore>,

    audio_saver: Rc<Debouncer<AudioPrefs>>,
    bookmarks_saver: Rc<Debouncer<Vec<Bookmark>>>,
    progress_saver: Rc<Debouncer<ProgressState>>,
    settings_saver: Rc<Debouncer<SettingsState>>,
    theme_saver: Rc<Debouncer<Theme>>,

    _subscriptions: Vec<Subscription>,
    storage: Storage,
}

impl Session {
    /// Opens a session with the default 500 ms save debounce.
    pub fn open(storage: Storage) -> Self {
        Self::open_with(storage, SessionOptions::default())
    }

    pub fn open_with(storage: Storage, options: SessionOptions) -> Self {
        // Seed every store from its persisted document. Audio is seeded
        // through its preference projection, so a restored session always
        // starts stopped no matter what was saved.
        let audio = Rc::new(AudioStore::new(AudioState::from_prefs(
            storage.load(keys::AUDIO, AudioPrefs::default()),
        )));
        let bookmarks = Rc::new(BookmarkStore::from_bookmarks(
            storage.load(keys::BOOKMARKS, Vec::new()),
        ));
        let progress = Rc::new(ProgressStore::new(
            storage.load(keys::PROGRESS, ProgressState::default()),
        ));
        let settings = Rc::new(SettingsStore::new(
            storage.load(keys::SETTINGS, SettingsState::default()),
        ));
        let theme = Rc::new(ThemeStore::new(storage.load(keys::THEME, Theme::default())));

        let wait = options.save_debounce;
        let mut subscriptions = Vec::with_capacity(5);

        let audio_saver = Self::wire(wait, &storage, keys::AUDIO);
        subscriptions.push(audio.subscribe({
            let saver = Rc::clone(&audio_saver);
            move |state: &AudioState| saver.call(state.prefs())
        }));

        let bookmarks_saver = Self::wire(wait, &storage, keys::BOOKMARKS);
        subscriptions.push(bookmarks.subscribe({
            let saver = Rc::clone(&bookmarks_saver);
            move |state: &BookmarksState| saver.call(state.bookmarks.clone())
        }));

        let progress_saver = Self::wire(wait, &storage, keys::PROGRESS);
        subscriptions.push(progress.subscribe({
            let saver = Rc::clone(&progress_saver);
            move |state: &ProgressState| saver.call(state.clone())
        }));

        let settings_saver = Self::wire(wait, &storage, keys::SETTINGS);
        subscriptions.push(settings.subscribe({
            let saver = Rc::clone(&settings_saver);
            move |state: &SettingsState| saver.call(state.clone())
        }));

        let theme_saver = Self::wire(wait, &storage, keys::THEME);
        subscriptions.push(theme.subscribe({
            let saver = Rc::clone(&theme_saver);
            move |theme: &Theme| saver.call(*theme)
        }));

        Self {
            audio,
            bookmarks,
            progress,
            settings,
            theme,
            audio_saver,
            bookmarks_saver,
            progress_saver,
            settings_saver,
            theme_saver,
            _subscriptions: subscriptions,
            storage,
        }
    }

    /// One debouncer per store, all writing through the shared storage
    /// facade under the store's key.
    fn wire<T: serde::Serialize + Send + 'static>(
        wait: Duration,
        storage: &Storage,
        key: &'static str,
    ) -> Rc<Debouncer<T>> {
        let storage = storage.clone();
        Rc::new(Debouncer::new(wait, move |value: T| {
            storage.save(key, &value);
        }))
    }

    pub fn audio(&self) -> Rc<AudioStore> {
        Rc::clone(&self.audio)
    }

    pub fn bookmarks(&self) -> Rc<BookmarkStore> {
        Rc::clone(&self.bookmarks)
    }

    pub fn progress(&self) -> Rc<ProgressStore> {
        Rc::clone(&self.progress)
    }

    pub fn settings(&self) -> Rc<SettingsStore> {
        Rc::clone(&self.settings)
    }

    pub fn theme(&self) -> Rc<ThemeStore> {
        Rc::clone(&self.theme)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Forces every pending write to disk now. Dropping the session does
    /// the same; this exists for explicit checkpoints (and determinism in
    /// tests).
    pub fn flush(&self) {
        self.audio_saver.flush();
        self.bookmarks_saver.flush();
        self.progress_saver.flush();
        self.settings_saver.flush();
        self.theme_saver.flush();
    }
}

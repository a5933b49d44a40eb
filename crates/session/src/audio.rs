//! Audio store: the playback state machine.
//!
//! Three phases (stopped, paused, playing) driven entirely by actions;
//! nothing here touches a device. The playback coordinator subscribes and
//! reconciles a device against whatever this store says.

use crate::store::{Store, Subscription};
use mushaf_core::{AudioState, RepeatMode, VerseKey};

pub struct AudioStore {
    store: Store<AudioState>,
}

impl AudioStore {
    pub fn new(initial: AudioState) -> Self {
        Self {
            store: Store::new(initial),
        }
    }

    pub fn state(&self) -> AudioState {
        self.store.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&AudioState) -> R) -> R {
        self.store.with(f)
    }

    pub fn subscribe(&self, listener: impl Fn(&AudioState) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    /// Starts (or restarts) playback of a verse. The chapter's verse count
    /// is updated only when the caller supplies one; passing `None` keeps
    /// whatever was known before. A zero chapter or verse is malformed and
    /// ignored.
    pub fn play(&self, chapter: u16, verse: u16, total_verses: Option<u16>) {
        if chapter == 0 || verse == 0 {
            log::warn!("Ignoring play request for malformed verse {chapter}:{verse}");
            return;
        }
        self.store.set(|state| AudioState {
            is_playing: true,
            current_verse: Some(VerseKey::new(chapter, verse)),
            total_verses_in_chapter: total_verses.unwrap_or(state.total_verses_in_chapter),
            ..state.clone()
        });
    }

    pub fn pause(&self) {
        self.store.set(|state| AudioState {
            is_playing: false,
            ..state.clone()
        });
    }

    /// Flips between playing and paused. With no verse loaded there is
    /// nothing to resume, so the toggle stays stopped instead of producing
    /// a playing-with-no-verse state.
    pub fn toggle_play(&self) {
        self.store.set(|state| {
            if state.current_verse.is_none() {
                return state.clone();
            }
            AudioState {
                is_playing: !state.is_playing,
                ..state.clone()
            }
        });
    }

    pub fn stop(&self) {
        self.store.set(|state| AudioState {
            is_playing: false,
            current_verse: None,
            ..state.clone()
        });
    }

    /// Advances past the end of the current verse.
    ///
    /// Repeat-verse keeps the state unchanged (the coordinator replays the
    /// same verse). Before the last verse the key advances by one with the
    /// play/pause flag untouched. At the chapter boundary repeat-chapter
    /// wraps to verse 1; otherwise playback stops.
    pub fn next_verse(&self, total_verses: u16) {
        self.store.set(|state| {
            let Some(current) = state.current_verse else {
                return state.clone();
            };
            match state.repeat_mode {
                RepeatMode::Verse => state.clone(),
                _ if current.verse() < total_verses => AudioState {
                    current_verse: Some(VerseKey::new(current.chapter(), current.verse() + 1)),
                    ..state.clone()
                },
                RepeatMode::Chapter => AudioState {
                    current_verse: Some(VerseKey::new(current.chapter(), 1)),
                    ..state.clone()
                },
                RepeatMode::None => AudioState {
                    is_playing: false,
                    current_verse: None,
                    ..state.clone()
                },
            }
        });
    }

    /// Steps back one verse; a no-op when stopped or already at verse 1.
    pub fn previous_verse(&self) {
        self.store.set(|state| {
            let Some(current) = state.current_verse else {
                return state.clone();
            };
            if current.verse() > 1 {
                AudioState {
                    current_verse: Some(VerseKey::new(current.chapter(), current.verse() - 1)),
                    ..state.clone()
                }
            } else {
                state.clone()
            }
        });
    }

    pub fn set_reciter(&self, reciter_id: impl Into<String>) {
        let reciter_id = reciter_id.into();
        self.store.set(|state| AudioState {
            reciter_id: reciter_id.clone(),
            ..state.clone()
        });
    }

    pub fn set_playback_speed(&self, speed: f32) {
        self.store.set(|state| AudioState {
            playback_speed: AudioState::clamp_speed(speed),
            ..state.clone()
        });
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.store.set(|state| AudioState {
            repeat_mode: mode,
            ..state.clone()
        });
    }

    pub fn set_volume(&self, volume: f32) {
        self.store.set(|state| AudioState {
            volume: AudioState::clamp_volume(volume),
            ..state.clone()
        });
    }

    pub fn set_auto_play_next(&self, auto_play: bool) {
        self.store.set(|state| AudioState {
            auto_play_next: auto_play,
            ..state.clone()
        });
    }
}

//! Settings store.

use crate::store::{Store, Subscription};
use mushaf_core::{ArabicFont, FontSize, Language, SettingsState};

pub struct SettingsStore {
    store: Store<SettingsState>,
}

impl SettingsStore {
    pub fn new(initial: SettingsState) -> Self {
        Self {
            store: Store::new(initial),
        }
    }

    pub fn state(&self) -> SettingsState {
        self.store.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&SettingsState) -> R) -> R {
        self.store.with(f)
    }

    pub fn subscribe(&self, listener: impl Fn(&SettingsState) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    pub fn set_language(&self, language: Language) {
        self.store.set(|state| SettingsState {
            language,
            ..state.clone()
        });
    }

    pub fn set_arabic_font(&self, font: ArabicFont) {
        self.store.set(|state| SettingsState {
            arabic_font: font,
            ..state.clone()
        });
    }

    pub fn set_font_size(&self, size: FontSize) {
        self.store.set(|state| SettingsState {
            font_size: size,
            ..state.clone()
        });
    }

    pub fn toggle_transliteration(&self) {
        self.store.set(|state| SettingsState {
            show_transliteration: !state.show_transliteration,
            ..state.clone()
        });
    }

    pub fn set_auto_play_next(&self, auto_play: bool) {
        self.store.set(|state| SettingsState {
            auto_play_next: auto_play,
            ..state.clone()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_replace_single_fields() {
        let settings = SettingsStore::new(SettingsState::default());

        settings.set_language(Language::Bengali);
        settings.set_arabic_font(ArabicFont::Uthmanic);
        settings.set_font_size(FontSize::Large);
        settings.set_auto_play_next(false);

        let state = settings.state();
        assert_eq!(state.language, Language::Bengali);
        assert_eq!(state.arabic_font, ArabicFont::Uthmanic);
        assert_eq!(state.font_size, FontSize::Large);
        assert!(!state.auto_play_next);
        // untouched field
        assert!(state.show_transliteration);
    }

    #[test]
    fn test_toggle_transliteration_flips() {
        let settings = SettingsStore::new(SettingsState::default());
        settings.toggle_transliteration();
        assert!(!settings.state().show_transliteration);
        settings.toggle_transliteration();
        assert!(settings.state().show_transliteration);
    }
}

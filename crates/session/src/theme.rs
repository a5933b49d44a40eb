//! Theme store.
//!
//! Holds the light/dark choice. Applying the theme to a rendering surface
//! is the embedder's job: it subscribes here and reads the initial value
//! once at startup.

use crate::store::{Store, Subscription};
use mushaf_core::Theme;

pub struct ThemeStore {
    store: Store<Theme>,
}

impl ThemeStore {
    pub fn new(initial: Theme) -> Self {
        Self {
            store: Store::new(initial),
        }
    }

    pub fn theme(&self) -> Theme {
        self.store.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&Theme) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set(|_| theme);
    }

    pub fn toggle(&self) {
        self.store.set(|theme| theme.toggled());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_alternates() {
        let theme = ThemeStore::new(Theme::Light);
        theme.toggle();
        assert_eq!(theme.theme(), Theme::Dark);
        theme.toggle();
        assert_eq!(theme.theme(), Theme::Light);
    }

    #[test]
    fn test_set_theme_broadcasts() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let theme = ThemeStore::new(Theme::Light);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = theme.subscribe({
            let seen = Rc::clone(&seen);
            move |t: &Theme| seen.borrow_mut().push(*t)
        });

        theme.set_theme(Theme::Dark);
        theme.set_theme(Theme::Dark);

        // Same-value set still broadcasts; consumers decide whether to care.
        assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Dark]);
    }
}

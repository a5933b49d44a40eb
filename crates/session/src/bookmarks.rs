//! Bookmark store.

use crate::store::{Store, Subscription};
use mushaf_core::{Bookmark, NewBookmark, VerseKey};

/// Insertion-ordered bookmark list with at most one entry per verse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookmarksState {
    pub bookmarks: Vec<Bookmark>,
}

pub struct BookmarkStore {
    store: Store<BookmarksState>,
}

impl BookmarkStore {
    pub fn new(initial: BookmarksState) -> Self {
        Self {
            store: Store::new(initial),
        }
    }

    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self::new(BookmarksState { bookmarks })
    }

    pub fn state(&self) -> BookmarksState {
        self.store.get()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.store.with(|state| state.bookmarks.clone())
    }

    pub fn subscribe(&self, listener: impl Fn(&BookmarksState) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    /// Appends a bookmark, stamping it with the current time. Adding a
    /// verse that is already bookmarked is a no-op; the original entry and
    /// its timestamp win.
    pub fn add(&self, new: NewBookmark) {
        self.store.set(|state| {
            if state.bookmarks.iter().any(|b| b.key() == new.key()) {
                return state.clone();
            }
            let mut bookmarks = state.bookmarks.clone();
            bookmarks.push(Bookmark::new(new));
            BookmarksState { bookmarks }
        });
    }

    pub fn remove(&self, key: &VerseKey) {
        self.store.set(|state| BookmarksState {
            bookmarks: state
                .bookmarks
                .iter()
                .filter(|b| b.key() != *key)
                .cloned()
                .collect(),
        });
    }

    /// Adds when absent, removes when present.
    pub fn toggle(&self, new: NewBookmark) {
        if self.is_bookmarked(&new.key()) {
            self.remove(&new.key());
        } else {
            self.add(new);
        }
    }

    pub fn is_bookmarked(&self, key: &VerseKey) -> bool {
        self.store
            .with(|state| state.bookmarks.iter().any(|b| b.key() == *key))
    }

    pub fn count(&self) -> usize {
        self.store.with(|state| state.bookmarks.len())
    }

    pub fn clear(&self) {
        self.store.set(|_| BookmarksState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BookmarkStore {
        BookmarkStore::new(BookmarksState::default())
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let bookmarks = store();
        bookmarks.add(NewBookmark::new(2, 255).with_chapter_name("Al-Baqarah"));
        bookmarks.add(NewBookmark::new(1, 1).with_chapter_name("Al-Fatihah"));

        let list = bookmarks.bookmarks();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].key(), VerseKey::new(2, 255));
        assert_eq!(list[1].key(), VerseKey::new(1, 1));
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let bookmarks = store();
        bookmarks.add(NewBookmark::new(2, 255).with_verse_text("first"));
        bookmarks.add(NewBookmark::new(2, 255).with_verse_text("second"));

        let list = bookmarks.bookmarks();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].verse_text.as_deref(), Some("first"));
    }

    #[test]
    fn test_remove_filters_by_key() {
        let bookmarks = store();
        bookmarks.add(NewBookmark::new(1, 1));
        bookmarks.add(NewBookmark::new(1, 2));
        bookmarks.remove(&VerseKey::new(1, 1));

        assert!(!bookmarks.is_bookmarked(&VerseKey::new(1, 1)));
        assert!(bookmarks.is_bookmarked(&VerseKey::new(1, 2)));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let bookmarks = store();
        bookmarks.add(NewBookmark::new(1, 1));
        bookmarks.remove(&VerseKey::new(9, 9));
        assert_eq!(bookmarks.count(), 1);
    }

    #[test]
    fn test_toggle_round_trip() {
        let bookmarks = store();
        let key = VerseKey::new(18, 10);

        bookmarks.toggle(NewBookmark::new(18, 10));
        assert!(bookmarks.is_bookmarked(&key));
        bookmarks.toggle(NewBookmark::new(18, 10));
        assert!(!bookmarks.is_bookmarked(&key));
    }

    #[test]
    fn test_clear_empties_the_list() {
        let bookmarks = store();
        bookmarks.add(NewBookmark::new(1, 1));
        bookmarks.add(NewBookmark::new(1, 2));
        bookmarks.clear();
        assert_eq!(bookmarks.count(), 0);
    }

    #[test]
    fn test_subscribers_see_additions() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let bookmarks = store();
        let counts = Rc::new(RefCell::new(Vec::new()));
        let _sub = bookmarks.subscribe({
            let counts = Rc::clone(&counts);
            move |state: &BookmarksState| counts.borrow_mut().push(state.bookmarks.len())
        });

        bookmarks.add(NewBookmark::new(1, 1));
        bookmarks.add(NewBookmark::new(1, 1));
        bookmarks.add(NewBookmark::new(1, 2));

        // The duplicate add still broadcasts (state replaced with an equal
        // value), so persistence sees three notifications.
        assert_eq!(*counts.borrow(), vec![1, 1, 2]);
    }
}

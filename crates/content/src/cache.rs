//! Process-lifetime memoization of content responses.
//!
//! The corpus is immutable upstream: the chapter list, the verse text and
//! the commentary do not change between visits, so every decoded response
//! is worth keeping for as long as the process runs. Values are stored as
//! `Arc`s and shared with callers; a second request for the same chapter
//! costs a map lookup, not a fetch.

use crate::types::{ChapterCommentary, ChapterDetail, ChapterSummary, VerseCommentary};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// One slot or map per response family.
///
/// Lock poisoning is treated as a miss on read and a skipped store on
/// write; a poisoned cache degrades to refetching, never to an error.
#[derive(Default)]
pub(crate) struct ResponseCache {
    chapters: Mutex<Option<Arc<Vec<ChapterSummary>>>>,
    details: Mutex<HashMap<u16, Arc<ChapterDetail>>>,
    verse_commentary: Mutex<HashMap<(u16, u16), Arc<VerseCommentary>>>,
    chapter_commentary: Mutex<HashMap<u16, Arc<ChapterCommentary>>>,
    reciters: Mutex<Option<Arc<BTreeMap<String, String>>>>,
}

impl ResponseCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn chapters(&self) -> Option<Arc<Vec<ChapterSummary>>> {
        self.chapters.lock().ok()?.clone()
    }

    pub(crate) fn store_chapters(&self, list: Arc<Vec<ChapterSummary>>) {
        if let Ok(mut slot) = self.chapters.lock() {
            *slot = Some(list);
        }
    }

    pub(crate) fn chapter(&self, number: u16) -> Option<Arc<ChapterDetail>> {
        self.details.lock().ok()?.get(&number).cloned()
    }

    pub(crate) fn store_chapter(&self, number: u16, detail: Arc<ChapterDetail>) {
        if let Ok(mut map) = self.details.lock() {
            map.insert(number, detail);
        }
    }

    pub(crate) fn verse_commentary(&self, chapter: u16, verse: u16) -> Option<Arc<VerseCommentary>> {
        self.verse_commentary.lock().ok()?.get(&(chapter, verse)).cloned()
    }

    pub(crate) fn store_verse_commentary(
        &self,
        chapter: u16,
        verse: u16,
        commentary: Arc<VerseCommentary>,
    ) {
        if let Ok(mut map) = self.verse_commentary.lock() {
            map.insert((chapter, verse), commentary);
        }
    }

    pub(crate) fn chapter_commentary(&self, chapter: u16) -> Option<Arc<ChapterCommentary>> {
        self.chapter_commentary.lock().ok()?.get(&chapter).cloned()
    }

    pub(crate) fn store_chapter_commentary(&self, chapter: u16, commentary: Arc<ChapterCommentary>) {
        if let Ok(mut map) = self.chapter_commentary.lock() {
            map.insert(chapter, commentary);
        }
    }

    pub(crate) fn reciters(&self) -> Option<Arc<BTreeMap<String, String>>> {
        self.reciters.lock().ok()?.clone()
    }

    pub(crate) fn store_reciters(&self, reciters: Arc<BTreeMap<String, String>>) {
        if let Ok(mut slot) = self.reciters.lock() {
            *slot = Some(reciters);
        }
    }
}

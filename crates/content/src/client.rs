//! Async client for the content API.

use crate::cache::ResponseCache;
use crate::error::{ContentError, ContentResult};
use crate::types::{ChapterCommentary, ChapterDetail, ChapterSummary, VerseCommentary};
use mushaf_core::CHAPTER_COUNT;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// Client for quranapi.pages.dev.
///
/// All reads go through the process-lifetime [`ResponseCache`], so each
/// endpoint is fetched at most once per run. Fetch failures surface as
/// [`ContentError`]s and are never retried here; the caller decides whether
/// to ask again.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

impl ContentClient {
    const API_BASE: &'static str = "https://quranapi.pages.dev/api";

    /// Builds a client against the public API.
    pub fn new() -> ContentResult<Self> {
        Self::with_base_url(Self::API_BASE)
    }

    /// Builds a client against an alternate API root, e.g. a mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> ContentResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: ResponseCache::new(),
        })
    }

    /// The chapter index: all 114 chapters with names and verse counts.
    pub async fn chapters(&self) -> ContentResult<Arc<Vec<ChapterSummary>>> {
        if let Some(cached) = self.cache.chapters() {
            return Ok(cached);
        }
        let list: Vec<ChapterSummary> = self.fetch("surah.json").await?;
        let list = Arc::new(list);
        self.cache.store_chapters(Arc::clone(&list));
        Ok(list)
    }

    /// One chapter with its full verse text in every language.
    pub async fn chapter(&self, number: u16) -> ContentResult<Arc<ChapterDetail>> {
        ensure_chapter_in_range(number)?;
        if let Some(cached) = self.cache.chapter(number) {
            return Ok(cached);
        }
        let detail: ChapterDetail = self.fetch(&format!("{number}.json")).await?;
        let detail = Arc::new(detail);
        self.cache.store_chapter(number, Arc::clone(&detail));
        Ok(detail)
    }

    /// Commentary on a single verse. The verse number is not validated
    /// client-side; a verse the chapter does not have comes back as a
    /// status error from the server.
    pub async fn verse_commentary(
        &self,
        chapter: u16,
        verse: u16,
    ) -> ContentResult<Arc<VerseCommentary>> {
        ensure_chapter_in_range(chapter)?;
        if let Some(cached) = self.cache.verse_commentary(chapter, verse) {
            return Ok(cached);
        }
        let commentary: VerseCommentary = self.fetch(&format!("tafsir/{chapter}_{verse}.json")).await?;
        let commentary = Arc::new(commentary);
        self.cache
            .store_verse_commentary(chapter, verse, Arc::clone(&commentary));
        Ok(commentary)
    }

    /// Commentary on a whole chapter, one entry list per verse.
    pub async fn chapter_commentary(&self, chapter: u16) -> ContentResult<Arc<ChapterCommentary>> {
        ensure_chapter_in_range(chapter)?;
        if let Some(cached) = self.cache.chapter_commentary(chapter) {
            return Ok(cached);
        }
        let commentary: ChapterCommentary = self.fetch(&format!("tafsir/{chapter}.json")).await?;
        let commentary = Arc::new(commentary);
        self.cache
            .store_chapter_commentary(chapter, Arc::clone(&commentary));
        Ok(commentary)
    }

    /// The reciters the API offers, id to display name.
    pub async fn reciters(&self) -> ContentResult<Arc<BTreeMap<String, String>>> {
        if let Some(cached) = self.cache.reciters() {
            return Ok(cached);
        }
        let reciters: BTreeMap<String, String> = self.fetch("reciters.json").await?;
        let reciters = Arc::new(reciters);
        self.cache.store_reciters(Arc::clone(&reciters));
        Ok(reciters)
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ContentResult<T> {
        let url = self.url_for(path);
        log::debug!("GET {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                url,
            });
        }
        response
            .json()
            .await
            .map_err(|source| ContentError::Decode { url, source })
    }
}

fn ensure_chapter_in_range(number: u16) -> ContentResult<()> {
    if (1..=CHAPTER_COUNT).contains(&number) {
        Ok(())
    } else {
        Err(ContentError::InvalidChapter(number))
    }
}

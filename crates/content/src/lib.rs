//! Read-only client for the Qur'an content API.
//!
//! Everything the app displays but never edits comes from here: the chapter
//! index, full chapter text with translations, per-verse and per-chapter
//! commentary, and the reciter list. The client is async (reqwest on top of
//! whatever tokio runtime the caller provides) and memoizes every successful
//! response for the life of the process, since the corpus it serves never
//! changes.
//!
//! Verse audio is *not* served by this API; see the player crate for how
//! recitation URLs are formed.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> mushaf_content::ContentResult<()> {
//! let client = mushaf_content::ContentClient::new()?;
//! let chapters = client.chapters().await?;
//! println!("{} chapters", chapters.len());
//!
//! let detail = client.chapter(2).await?;
//! for verse in detail.verses() {
//!     println!("{}: {}", verse.number, verse.arabic);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod error;
mod types;

pub use client::ContentClient;
pub use error::{ContentError, ContentResult};
pub use types::{
    ChapterCommentary, ChapterDetail, ChapterRecitation, ChapterSummary, RevelationPlace,
    TafsirEntry, Verse, VerseCommentary,
};

//! Response shapes of the quranapi.pages.dev content API.
//!
//! Field names follow crate conventions; serde renames map them onto the
//! wire format. Chapter text arrives as parallel per-verse arrays, one per
//! language; [`ChapterDetail::verses`] zips them into row form.

use mushaf_core::Language;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Where a chapter was revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RevelationPlace {
    Mecca,
    Madina,
}

impl fmt::Display for RevelationPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevelationPlace::Mecca => write!(f, "Mecca"),
            RevelationPlace::Madina => write!(f, "Madina"),
        }
    }
}

/// One row of the chapter index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterSummary {
    #[serde(rename = "surahName")]
    pub name: String,
    #[serde(rename = "surahNameArabic")]
    pub arabic_name: String,
    #[serde(rename = "surahNameArabicLong")]
    pub arabic_name_long: String,
    #[serde(rename = "surahNameTranslation")]
    pub translated_name: String,
    #[serde(rename = "revelationPlace")]
    pub revelation_place: RevelationPlace,
    #[serde(rename = "totalAyah")]
    pub verse_count: u16,
}

/// Whole-chapter audio in one reciter's voice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterRecitation {
    pub reciter: String,
    pub url: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
}

/// A full chapter: metadata, per-reciter audio, and the verse text as
/// parallel arrays indexed by verse minus one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChapterDetail {
    #[serde(rename = "surahName")]
    pub name: String,
    #[serde(rename = "surahNameArabic")]
    pub arabic_name: String,
    #[serde(rename = "surahNameArabicLong")]
    pub arabic_name_long: String,
    #[serde(rename = "surahNameTranslation")]
    pub translated_name: String,
    #[serde(rename = "revelationPlace")]
    pub revelation_place: RevelationPlace,
    #[serde(rename = "totalAyah")]
    pub verse_count: u16,
    #[serde(rename = "surahNo")]
    pub number: u16,
    /// Keyed by reciter id ("1", "2", ...).
    #[serde(default)]
    pub audio: BTreeMap<String, ChapterRecitation>,
    /// Arabic with diacritics.
    #[serde(rename = "arabic1")]
    pub arabic: Vec<String>,
    /// Simplified Arabic.
    #[serde(rename = "arabic2")]
    pub arabic_simplified: Vec<String>,
    pub english: Vec<String>,
    pub bengali: Vec<String>,
    pub urdu: Vec<String>,
}

impl ChapterDetail {
    /// Zips the parallel text arrays into one row per verse.
    ///
    /// The English array drives the count, like the upstream data promises;
    /// a ragged translation array yields empty strings rather than a panic.
    pub fn verses(&self) -> Vec<Verse> {
        (0..self.english.len())
            .map(|i| Verse {
                number: (i + 1) as u16,
                arabic: self.arabic.get(i).cloned().unwrap_or_default(),
                arabic_simplified: self.arabic_simplified.get(i).cloned().unwrap_or_default(),
                english: self.english[i].clone(),
                bengali: self.bengali.get(i).cloned().unwrap_or_default(),
                urdu: self.urdu.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// One verse with its text in every language the API carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u16,
    pub arabic: String,
    pub arabic_simplified: String,
    pub english: String,
    pub bengali: String,
    pub urdu: String,
}

impl Verse {
    /// The translation matching a reader's language preference.
    pub fn translation(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Bengali => &self.bengali,
            Language::Urdu => &self.urdu,
        }
    }
}

/// One commentary passage. `group_verse` is set when the passage covers a
/// range of verses rather than a single one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TafsirEntry {
    pub author: String,
    #[serde(rename = "groupVerse")]
    pub group_verse: Option<String>,
    /// Markdown.
    pub content: String,
}

/// Commentary on a single verse, one entry per author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerseCommentary {
    #[serde(rename = "surahName")]
    pub chapter_name: String,
    #[serde(rename = "surahNo")]
    pub chapter: u16,
    #[serde(rename = "ayahNo")]
    pub verse: u16,
    pub tafsirs: Vec<TafsirEntry>,
}

/// Commentary on a whole chapter: one entry list per verse, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChapterCommentary {
    #[serde(rename = "surahName")]
    pub chapter_name: String,
    #[serde(rename = "totalVerse")]
    pub verse_count: u16,
    pub tafsirs: Vec<Vec<TafsirEntry>>,
}

impl ChapterCommentary {
    /// Commentary entries for one verse, if the chapter has that verse.
    pub fn for_verse(&self, verse: u16) -> Option<&[TafsirEntry]> {
        verse
            .checked_sub(1)
            .and_then(|i| self.tafsirs.get(i as usize))
            .map(Vec::as_slice)
    }
}

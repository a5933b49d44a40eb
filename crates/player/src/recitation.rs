//! Recitation source resolution.
//!
//! Verse audio is served per-verse from the everyayah.com CDN, one
//! directory per reciter, files named by zero-padded chapter and verse
//! (`002255.mp3` for 2:255). Reciter ids are the small numeric ids the
//! content API hands out; anything unknown falls back to the default
//! reciter rather than producing a dead URL.

use mushaf_core::{VerseKey, DEFAULT_RECITER_ID};

const CDN_BASE: &str = "https://everyayah.com/data";

/// Reciter id, display name and CDN directory.
pub struct Reciter {
    pub id: &'static str,
    pub name: &'static str,
    directory: &'static str,
}

/// The reciters the content API exposes, keyed by its numeric ids.
pub const RECITERS: &[Reciter] = &[
    Reciter {
        id: "1",
        name: "Mishary Rashid Al Afasy",
        directory: "Alafasy_128kbps",
    },
    Reciter {
        id: "2",
        name: "Abu Bakr Al Shatri",
        directory: "Abu_Bakr_Ash-Shaatree_128kbps",
    },
    Reciter {
        id: "3",
        name: "Nasser Al Qatami",
        directory: "Nasser_Alqatami_128kbps",
    },
    Reciter {
        id: "4",
        name: "Yasser Al Dosari",
        directory: "Yasser_Ad-Dussary_128kbps",
    },
    Reciter {
        id: "5",
        name: "Hani Ar Rifai",
        directory: "Hani_Rifai_192kbps",
    },
];

fn directory_for(reciter_id: &str) -> &'static str {
    RECITERS
        .iter()
        .find(|r| r.id == reciter_id)
        .or_else(|| RECITERS.iter().find(|r| r.id == DEFAULT_RECITER_ID))
        .map(|r| r.directory)
        .unwrap_or("Alafasy_128kbps")
}

/// CDN URL for one verse in one reciter's voice. Total: every input maps
/// to some URL, with unknown reciters resolved to the default voice.
pub fn recitation_url(verse: VerseKey, reciter_id: &str) -> String {
    format!(
        "{CDN_BASE}/{}/{:03}{:03}.mp3",
        directory_for(reciter_id),
        verse.chapter(),
        verse.verse()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_zero_pads_chapter_and_verse() {
        assert_eq!(
            recitation_url(VerseKey::new(2, 255), "1"),
            "https://everyayah.com/data/Alafasy_128kbps/002255.mp3"
        );
        assert_eq!(
            recitation_url(VerseKey::new(114, 6), "1"),
            "https://everyayah.com/data/Alafasy_128kbps/114006.mp3"
        );
    }

    #[test]
    fn test_each_reciter_has_its_own_directory() {
        let urls: Vec<String> = RECITERS
            .iter()
            .map(|r| recitation_url(VerseKey::new(1, 1), r.id))
            .collect();
        for (i, url) in urls.iter().enumerate() {
            for other in &urls[i + 1..] {
                assert_ne!(url, other);
            }
        }
    }

    #[test]
    fn test_unknown_reciter_falls_back_to_default() {
        assert_eq!(
            recitation_url(VerseKey::new(1, 1), "999"),
            recitation_url(VerseKey::new(1, 1), DEFAULT_RECITER_ID)
        );
        assert_eq!(
            recitation_url(VerseKey::new(1, 1), ""),
            recitation_url(VerseKey::new(1, 1), "1")
        );
    }
}

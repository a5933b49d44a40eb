//! Reader preferences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Translation language shown alongside the Arabic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Bengali,
    Urdu,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::English => "english",
            Language::Bengali => "bengali",
            Language::Urdu => "urdu",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(Language::English),
            "bengali" => Ok(Language::Bengali),
            "urdu" => Ok(Language::Urdu),
            other => Err(format!(
                "unknown language '{other}' (expected english, bengali or urdu)"
            )),
        }
    }
}

/// Typeface used for the Arabic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArabicFont {
    #[default]
    Amiri,
    Scheherazade,
    Uthmanic,
}

impl fmt::Display for ArabicFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArabicFont::Amiri => "amiri",
            ArabicFont::Scheherazade => "scheherazade",
            ArabicFont::Uthmanic => "uthmanic",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ArabicFont {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amiri" => Ok(ArabicFont::Amiri),
            "scheherazade" => Ok(ArabicFont::Scheherazade),
            "uthmanic" => Ok(ArabicFont::Uthmanic),
            other => Err(format!(
                "unknown font '{other}' (expected amiri, scheherazade or uthmanic)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(format!(
                "unknown font size '{other}' (expected small, medium or large)"
            )),
        }
    }
}

/// State of the settings store. Fields missing from a persisted save fall
/// back to their defaults, so saves written by older builds keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    pub language: Language,
    pub arabic_font: ArabicFont,
    pub font_size: FontSize,
    pub show_transliteration: bool,
    /// Preference for whether finishing a verse should queue the next one.
    /// The audio store consults it when playback starts.
    pub auto_play_next: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            language: Language::English,
            arabic_font: ArabicFont::Amiri,
            font_size: FontSize::Medium,
            show_transliteration: true,
            auto_play_next: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SettingsState::default();
        assert_eq!(state.language, Language::English);
        assert_eq!(state.arabic_font, ArabicFont::Amiri);
        assert_eq!(state.font_size, FontSize::Medium);
        assert!(state.show_transliteration);
        assert!(state.auto_play_next);
    }

    #[test]
    fn test_partial_save_merges_over_defaults() {
        let state: SettingsState =
            serde_json::from_str("{\"language\":\"urdu\",\"font_size\":\"large\"}").unwrap();
        assert_eq!(state.language, Language::Urdu);
        assert_eq!(state.font_size, FontSize::Large);
        assert_eq!(state.arabic_font, ArabicFont::Amiri);
        assert!(state.auto_play_next);
    }

    #[test]
    fn test_enum_parse_round_trips() {
        for lang in [Language::English, Language::Bengali, Language::Urdu] {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
        for font in [
            ArabicFont::Amiri,
            ArabicFont::Scheherazade,
            ArabicFont::Uthmanic,
        ] {
            assert_eq!(font.to_string().parse::<ArabicFont>().unwrap(), font);
        }
        for size in [FontSize::Small, FontSize::Medium, FontSize::Large] {
            assert_eq!(size.to_string().parse::<FontSize>().unwrap(), size);
        }
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("klingon".parse::<Language>().is_err());
        assert!("comic-sans".parse::<ArabicFont>().is_err());
        assert!("xxl".parse::<FontSize>().is_err());
    }
}

//! Playback state for the recitation player.

use crate::types::verse::VerseKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reciter used when no preference has been saved yet.
pub const DEFAULT_RECITER_ID: &str = "1";

/// What to do when playback reaches the end of a verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Advance to the next verse, stopping at the chapter boundary.
    #[default]
    None,
    /// Replay the same verse.
    Verse,
    /// Advance to the next verse, wrapping to verse 1 at the boundary.
    Chapter,
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatMode::None => "none",
            RepeatMode::Verse => "verse",
            RepeatMode::Chapter => "chapter",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RepeatMode::None),
            "verse" => Ok(RepeatMode::Verse),
            "chapter" => Ok(RepeatMode::Chapter),
            other => Err(format!(
                "unknown repeat mode '{other}' (expected none, verse or chapter)"
            )),
        }
    }
}

/// Coarse phase of the player, derived from [`AudioState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No verse loaded.
    Stopped,
    /// A verse is loaded but not advancing.
    Paused,
    /// A verse is loaded and advancing.
    Playing,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlaybackPhase::Stopped => "stopped",
            PlaybackPhase::Paused => "paused",
            PlaybackPhase::Playing => "playing",
        };
        write!(f, "{s}")
    }
}

/// Full state of the audio store.
///
/// `current_verse == None` implies `is_playing == false`; the store actions
/// maintain that invariant, so a `Stopped` phase can never report itself as
/// playing.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioState {
    pub current_verse: Option<VerseKey>,
    pub is_playing: bool,
    pub reciter_id: String,
    pub playback_speed: f32,
    pub repeat_mode: RepeatMode,
    pub volume: f32,
    /// Whether finishing a verse should queue the next one.
    pub auto_play_next: bool,
    /// Verse count of the chapter currently loaded, 0 when unknown. Boundary
    /// decisions at end-of-verse need it; it is session-local and never
    /// persisted.
    pub total_verses_in_chapter: u16,
}

impl AudioState {
    pub const MIN_SPEED: f32 = 0.25;
    pub const MAX_SPEED: f32 = 2.0;
    pub const DEFAULT_SPEED: f32 = 1.0;
    pub const DEFAULT_VOLUME: f32 = 1.0;

    /// Clamps a requested speed into the supported range. Non-finite input
    /// falls back to normal speed rather than poisoning the state.
    pub fn clamp_speed(speed: f32) -> f32 {
        if speed.is_finite() {
            speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED)
        } else {
            Self::DEFAULT_SPEED
        }
    }

    /// Clamps a requested volume into `[0.0, 1.0]`.
    pub fn clamp_volume(volume: f32) -> f32 {
        if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_VOLUME
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (self.current_verse, self.is_playing) {
            (None, _) => PlaybackPhase::Stopped,
            (Some(_), false) => PlaybackPhase::Paused,
            (Some(_), true) => PlaybackPhase::Playing,
        }
    }

    /// The persisted slice of this state. Transport fields (`current_verse`,
    /// `is_playing`, `total_verses_in_chapter`) are deliberately absent so a
    /// restored session always starts stopped.
    pub fn prefs(&self) -> AudioPrefs {
        AudioPrefs {
            reciter_id: self.reciter_id.clone(),
            playback_speed: self.playback_speed,
            repeat_mode: self.repeat_mode,
            volume: self.volume,
            auto_play_next: self.auto_play_next,
        }
    }

    /// Overlays saved preferences on a default (stopped) state.
    pub fn from_prefs(prefs: AudioPrefs) -> Self {
        Self {
            reciter_id: prefs.reciter_id,
            playback_speed: AudioState::clamp_speed(prefs.playback_speed),
            volume: AudioState::clamp_volume(prefs.volume),
            repeat_mode: prefs.repeat_mode,
            auto_play_next: prefs.auto_play_next,
            ..Self::default()
        }
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            current_verse: None,
            is_playing: false,
            reciter_id: DEFAULT_RECITER_ID.to_string(),
            playback_speed: Self::DEFAULT_SPEED,
            repeat_mode: RepeatMode::None,
            volume: Self::DEFAULT_VOLUME,
            auto_play_next: true,
            total_verses_in_chapter: 0,
        }
    }
}

/// Persisted audio preferences. Unknown or missing fields fall back to
/// defaults so older saves keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioPrefs {
    pub reciter_id: String,
    pub playback_speed: f32,
    pub repeat_mode: RepeatMode,
    pub volume: f32,
    pub auto_play_next: bool,
}

impl Default for AudioPrefs {
    fn default() -> Self {
        AudioState::default().prefs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_stopped() {
        let state = AudioState::default();
        assert_eq!(state.phase(), PlaybackPhase::Stopped);
        assert!(!state.is_playing);
        assert!(state.current_verse.is_none());
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = AudioState {
            current_verse: Some(VerseKey::new(1, 1)),
            ..AudioState::default()
        };
        assert_eq!(state.phase(), PlaybackPhase::Paused);
        state.is_playing = true;
        assert_eq!(state.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn test_speed_clamping() {
        assert_eq!(AudioState::clamp_speed(0.1), AudioState::MIN_SPEED);
        assert_eq!(AudioState::clamp_speed(5.0), AudioState::MAX_SPEED);
        assert_eq!(AudioState::clamp_speed(1.5), 1.5);
        assert_eq!(AudioState::clamp_speed(f32::NAN), AudioState::DEFAULT_SPEED);
        assert_eq!(
            AudioState::clamp_speed(f32::INFINITY),
            AudioState::DEFAULT_SPEED
        );
    }

    #[test]
    fn test_volume_clamping() {
        assert_eq!(AudioState::clamp_volume(-0.5), 0.0);
        assert_eq!(AudioState::clamp_volume(1.5), 1.0);
        assert_eq!(AudioState::clamp_volume(0.3), 0.3);
        assert_eq!(
            AudioState::clamp_volume(f32::NAN),
            AudioState::DEFAULT_VOLUME
        );
    }

    #[test]
    fn test_prefs_exclude_transport_state() {
        let state = AudioState {
            current_verse: Some(VerseKey::new(2, 255)),
            is_playing: true,
            total_verses_in_chapter: 286,
            playback_speed: 1.25,
            auto_play_next: false,
            ..AudioState::default()
        };
        let restored = AudioState::from_prefs(state.prefs());
        assert_eq!(restored.phase(), PlaybackPhase::Stopped);
        assert_eq!(restored.playback_speed, 1.25);
        assert_eq!(restored.total_verses_in_chapter, 0);
        assert!(!restored.auto_play_next);
    }

    #[test]
    fn test_prefs_tolerate_missing_fields() {
        let prefs: AudioPrefs = serde_json::from_str("{\"volume\":0.5}").unwrap();
        assert_eq!(prefs.volume, 0.5);
        assert_eq!(prefs.reciter_id, DEFAULT_RECITER_ID);
        assert_eq!(prefs.repeat_mode, RepeatMode::None);
        assert!(prefs.auto_play_next);
    }

    #[test]
    fn test_repeat_mode_round_trip() {
        for mode in [RepeatMode::None, RepeatMode::Verse, RepeatMode::Chapter] {
            assert_eq!(mode.to_string().parse::<RepeatMode>().unwrap(), mode);
        }
        assert!("loop".parse::<RepeatMode>().is_err());
    }
}

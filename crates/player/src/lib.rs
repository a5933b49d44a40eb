//! Playback layer: drives one audio device from the session's audio store.
//!
//! The session layer never talks to hardware. This crate closes the loop:
//! a [`Coordinator`] subscribes to the audio store, diffs each broadcast
//! against what it last applied to a [`PlaybackDevice`], and issues only
//! the commands that changed something. Completions and failures flow back
//! as [`DeviceEvent`]s and are folded into the store, which keeps every
//! other subscriber (UI, persistence) in agreement about what is playing.
//!
//! # Architecture
//!
//! - [`device`]: the device contract plus a scriptable [`SimDevice`].
//! - [`coordinator`]: store-to-device reconciliation and event handling.
//! - [`recitation`]: verse audio URL resolution per reciter.
//! - [`notify`]: where unrecoverable playback failures are reported.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use mushaf_player::{Coordinator, LogNotifier, SimDevice};
//! use mushaf_session::AudioStore;
//! use mushaf_core::AudioState;
//!
//! let audio = Rc::new(AudioStore::new(AudioState::default()));
//! let device = SimDevice::new();
//! let coordinator = Coordinator::new(
//!     Rc::clone(&audio),
//!     Box::new(device),
//!     Box::new(LogNotifier),
//! );
//!
//! audio.play(2, 255, Some(286));
//! coordinator.pump_events();
//! ```

pub mod coordinator;
pub mod device;
pub mod error;
pub mod notify;
pub mod recitation;

pub use coordinator::Coordinator;
pub use device::{
    DeviceCommand, DeviceErrorKind, DeviceEvent, PlaybackDevice, SimDevice, SimHandle,
};
pub use error::{PlayerError, PlayerResult};
pub use notify::{LogNotifier, Notifier};
pub use recitation::{recitation_url, Reciter, RECITERS};

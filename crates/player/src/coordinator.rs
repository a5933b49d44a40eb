//! Playback coordinator: reconciles one device against the audio store.
//!
//! Nothing commands the device directly. User intent lands in the
//! [`AudioStore`] as plain state, the coordinator subscribes to it and
//! issues whatever device calls close the gap between that state and what
//! it last applied. Device completions and failures come back through
//! [`pump_events`](Coordinator::pump_events) and are folded into the store
//! as ordinary actions, so the store stays the single source of truth.

use crate::device::{DeviceErrorKind, DeviceEvent, PlaybackDevice};
use crate::notify::Notifier;
use crate::recitation::recitation_url;
use crossbeam_channel::Receiver;
use mushaf_core::{AudioState, VerseKey};
use mushaf_session::{AudioStore, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// What the coordinator last pushed to the device. Diffing against this is
/// what keeps reconciliation from re-issuing commands the device already
/// honored.
#[derive(Default)]
struct Applied {
    /// Loaded source, identified by verse and reciter. Survives a stop so
    /// replaying the same verse skips the reload.
    source: Option<(VerseKey, String)>,
    playing: bool,
    volume: Option<f32>,
    speed: Option<f32>,
    /// Bumped on every load; events carrying an older generation belong to
    /// a superseded source and are dropped.
    generation: u64,
}

struct Inner {
    device: Box<dyn PlaybackDevice>,
    notifier: Box<dyn Notifier>,
    applied: Applied,
}

/// Drives a [`PlaybackDevice`] from the audio store.
///
/// Single-threaded like the stores it watches. Dropping the coordinator
/// detaches it from the store and releases the device.
pub struct Coordinator {
    audio: Rc<AudioStore>,
    inner: Rc<RefCell<Inner>>,
    events: Receiver<DeviceEvent>,
    _subscription: Subscription,
}

impl Coordinator {
    pub fn new(
        audio: Rc<AudioStore>,
        device: Box<dyn PlaybackDevice>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let events = device.events();
        let inner = Rc::new(RefCell::new(Inner {
            device,
            notifier,
            applied: Applied::default(),
        }));

        let subscription = audio.subscribe({
            let inner = Rc::downgrade(&inner);
            move |state| {
                if let Some(inner) = inner.upgrade() {
                    reconcile(&inner, state);
                }
            }
        });

        let coordinator = Self {
            audio,
            inner,
            events,
            _subscription: subscription,
        };
        // Align the device with whatever state the session restored.
        coordinator
            .audio
            .with(|state| reconcile(&coordinator.inner, state));
        coordinator
    }

    /// Drains pending device events into the store.
    ///
    /// Call this from the host's idle loop. Each event is handled with no
    /// borrow held, so the store actions it dispatches reconcile freely.
    pub fn pump_events(&self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    fn handle_event(&self, event: DeviceEvent) {
        match event {
            DeviceEvent::Ended { generation } => {
                {
                    let mut inner = self.inner.borrow_mut();
                    if generation != inner.applied.generation {
                        log::debug!("Dropping ended event from superseded load {generation}");
                        return;
                    }
                    // The device is back at the start of its source; any
                    // replay needs a fresh play command.
                    inner.applied.playing = false;
                }
                let state = self.audio.state();
                if state.auto_play_next && state.total_verses_in_chapter > 0 {
                    self.audio.next_verse(state.total_verses_in_chapter);
                } else {
                    self.audio.stop();
                }
            }
            DeviceEvent::Error {
                generation,
                kind,
                message,
            } => {
                {
                    let mut inner = self.inner.borrow_mut();
                    if generation != inner.applied.generation {
                        log::debug!(
                            "Dropping error from superseded load {generation}: {message}"
                        );
                        return;
                    }
                    if kind == DeviceErrorKind::Aborted {
                        // Interrupted loads are routine when the user skips
                        // quickly; not worth surfacing.
                        log::debug!("Load aborted: {message}");
                        return;
                    }
                    inner.applied.playing = false;
                }
                log::warn!("Playback failed ({kind:?}): {message}");
                self.inner
                    .borrow()
                    .notifier
                    .notify_error("Could not play recitation");
                self.audio.stop();
            }
        }
    }
}

/// Issues the device calls that bring it in line with `state`.
///
/// Volume and speed are pushed whenever they drift, playing or not. The
/// source reloads only when the verse or reciter actually changed; a failed
/// command leaves the applied record untouched so the next broadcast
/// retries it.
fn reconcile(inner: &RefCell<Inner>, state: &AudioState) {
    let mut guard = inner.borrow_mut();
    let Inner {
        device, applied, ..
    } = &mut *guard;

    if applied.volume != Some(state.volume) {
        match device.set_volume(state.volume) {
            Ok(()) => applied.volume = Some(state.volume),
            Err(e) => log::warn!("Device rejected volume change: {e}"),
        }
    }

    if applied.speed != Some(state.playback_speed) {
        match device.set_speed(state.playback_speed) {
            Ok(()) => applied.speed = Some(state.playback_speed),
            Err(e) => log::warn!("Device rejected speed change: {e}"),
        }
    }

    if let Some(verse) = state.current_verse {
        let wanted = (verse, state.reciter_id.clone());
        if applied.source.as_ref() != Some(&wanted) {
            let url = recitation_url(verse, &state.reciter_id);
            let generation = applied.generation + 1;
            match device.load(&url, generation) {
                Ok(()) => {
                    applied.generation = generation;
                    applied.source = Some(wanted);
                    applied.playing = false;
                }
                Err(e) => log::warn!("Device failed to load {url}: {e}"),
            }
        }
    }

    let should_play = state.is_playing && applied.source.is_some();
    if should_play && !applied.playing {
        match device.play() {
            Ok(()) => applied.playing = true,
            Err(e) => log::warn!("Device refused to start playback: {e}"),
        }
    } else if !should_play && applied.playing {
        match device.pause() {
            Ok(()) => applied.playing = false,
            Err(e) => log::warn!("Device refused to pause: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCommand, SimDevice, SimHandle};
    use mushaf_core::RepeatMode;

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        errors: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }

        fn notify_success(&self, _message: &str) {}
    }

    fn setup() -> (Rc<AudioStore>, Coordinator, SimHandle, RecordingNotifier) {
        let audio = Rc::new(AudioStore::new(AudioState::default()));
        let device = SimDevice::new();
        let handle = device.handle();
        let notifier = RecordingNotifier::default();
        let coordinator = Coordinator::new(
            Rc::clone(&audio),
            Box::new(device),
            Box::new(notifier.clone()),
        );
        (audio, coordinator, handle, notifier)
    }

    #[test]
    fn test_initial_reconcile_pushes_volume_and_speed_only() {
        let (_audio, _coordinator, handle, _) = setup();
        assert_eq!(
            handle.commands(),
            vec![DeviceCommand::SetVolume(1.0), DeviceCommand::SetSpeed(1.0)]
        );
    }

    #[test]
    fn test_play_loads_then_plays() {
        let (audio, _coordinator, handle, _) = setup();
        handle.clear_commands();

        audio.play(2, 255, Some(286));

        assert_eq!(
            handle.commands(),
            vec![
                DeviceCommand::Load {
                    url: "https://everyayah.com/data/Alafasy_128kbps/002255.mp3".to_string(),
                    generation: 1,
                },
                DeviceCommand::Play,
            ]
        );
    }

    #[test]
    fn test_pause_and_resume_do_not_reload() {
        let (audio, _coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        audio.pause();
        audio.toggle_play();

        assert_eq!(
            handle.commands(),
            vec![DeviceCommand::Pause, DeviceCommand::Play]
        );
    }

    #[test]
    fn test_stop_pauses_but_keeps_source_loaded() {
        let (audio, _coordinator, handle, _) = setup();
        audio.play(1, 3, Some(7));
        handle.clear_commands();

        audio.stop();
        // Replaying the very same verse reuses the loaded source.
        audio.play(1, 3, None);

        assert_eq!(
            handle.commands(),
            vec![DeviceCommand::Pause, DeviceCommand::Play]
        );
    }

    #[test]
    fn test_verse_change_reloads_with_fresh_generation() {
        let (audio, _coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        audio.next_verse(7);

        assert_eq!(
            handle.commands(),
            vec![
                DeviceCommand::Load {
                    url: "https://everyayah.com/data/Alafasy_128kbps/001002.mp3".to_string(),
                    generation: 2,
                },
                DeviceCommand::Play,
            ]
        );
    }

    #[test]
    fn test_reciter_change_reloads_current_verse() {
        let (audio, _coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        audio.set_reciter("5");

        assert_eq!(
            handle.commands(),
            vec![
                DeviceCommand::Load {
                    url: "https://everyayah.com/data/Hani_Rifai_192kbps/001001.mp3".to_string(),
                    generation: 2,
                },
                DeviceCommand::Play,
            ]
        );
    }

    #[test]
    fn test_volume_and_speed_apply_while_paused() {
        let (audio, _coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        audio.pause();
        handle.clear_commands();

        audio.set_volume(0.4);
        audio.set_playback_speed(1.5);

        assert_eq!(
            handle.commands(),
            vec![DeviceCommand::SetVolume(0.4), DeviceCommand::SetSpeed(1.5)]
        );
    }

    #[test]
    fn test_unchanged_volume_is_not_reissued() {
        let (audio, _coordinator, handle, _) = setup();
        handle.clear_commands();

        audio.set_volume(1.0);

        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_ended_with_auto_play_advances() {
        let (audio, coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        handle.emit_ended(1);
        assert_eq!(coordinator.pump_events(), 1);

        assert_eq!(audio.state().current_verse, Some(VerseKey::new(1, 2)));
        assert_eq!(
            handle.commands(),
            vec![
                DeviceCommand::Load {
                    url: "https://everyayah.com/data/Alafasy_128kbps/001002.mp3".to_string(),
                    generation: 2,
                },
                DeviceCommand::Play,
            ]
        );
    }

    #[test]
    fn test_ended_without_auto_play_stops() {
        let (audio, coordinator, handle, _) = setup();
        audio.set_auto_play_next(false);
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        handle.emit_ended(1);
        coordinator.pump_events();

        assert!(audio.state().current_verse.is_none());
        // The device already stopped on its own; no commands needed.
        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_ended_at_chapter_end_stops() {
        let (audio, coordinator, handle, _) = setup();
        audio.play(1, 7, Some(7));
        handle.clear_commands();

        handle.emit_ended(1);
        coordinator.pump_events();

        assert!(!audio.state().is_playing);
        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_ended_with_repeat_verse_replays_without_reload() {
        let (audio, coordinator, handle, _) = setup();
        audio.set_repeat_mode(RepeatMode::Verse);
        audio.play(1, 3, Some(7));
        handle.clear_commands();

        handle.emit_ended(1);
        coordinator.pump_events();

        assert_eq!(audio.state().current_verse, Some(VerseKey::new(1, 3)));
        assert_eq!(handle.commands(), vec![DeviceCommand::Play]);
    }

    #[test]
    fn test_ended_from_superseded_load_is_ignored() {
        let (audio, coordinator, handle, _) = setup();
        audio.play(1, 1, Some(7));
        audio.next_verse(7);
        handle.clear_commands();

        // The first load finished after the second superseded it.
        handle.emit_ended(1);
        coordinator.pump_events();

        assert_eq!(audio.state().current_verse, Some(VerseKey::new(1, 2)));
        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_device_error_notifies_and_stops() {
        let (audio, coordinator, handle, notifier) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        handle.emit_error(1, DeviceErrorKind::Network, "connection reset");
        coordinator.pump_events();

        assert_eq!(
            *notifier.errors.borrow(),
            vec!["Could not play recitation".to_string()]
        );
        assert!(audio.state().current_verse.is_none());
        assert!(!audio.state().is_playing);
    }

    #[test]
    fn test_aborted_error_is_suppressed() {
        let (audio, coordinator, handle, notifier) = setup();
        audio.play(1, 1, Some(7));
        handle.clear_commands();

        handle.emit_error(1, DeviceErrorKind::Aborted, "superseded");
        coordinator.pump_events();

        assert!(notifier.errors.borrow().is_empty());
        assert!(audio.state().is_playing);
        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_stale_error_is_ignored() {
        let (audio, coordinator, handle, notifier) = setup();
        audio.play(1, 1, Some(7));
        audio.next_verse(7);
        handle.clear_commands();

        handle.emit_error(1, DeviceErrorKind::Decode, "bad frame");
        coordinator.pump_events();

        assert!(notifier.errors.borrow().is_empty());
        assert!(audio.state().is_playing);
    }

    #[test]
    fn test_pump_with_no_events_is_a_noop() {
        let (_audio, coordinator, handle, _) = setup();
        handle.clear_commands();
        assert_eq!(coordinator.pump_events(), 0);
        assert_eq!(handle.commands(), Vec::new());
    }

    #[test]
    fn test_dropping_coordinator_detaches_from_store() {
        let (audio, coordinator, handle, _) = setup();
        drop(coordinator);
        handle.clear_commands();

        audio.play(1, 1, Some(7));

        assert_eq!(handle.commands(), Vec::new());
    }
}

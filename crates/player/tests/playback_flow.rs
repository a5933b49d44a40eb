//! End-to-end playback flows: a real session wired to a simulated device.

use mushaf_core::{PlaybackPhase, VerseKey};
use mushaf_player::{Coordinator, DeviceCommand, DeviceErrorKind, LogNotifier, SimDevice};
use mushaf_session::{Session, SessionOptions};
use mushaf_storage::Storage;
use std::time::Duration;

fn instant_session(storage: &Storage) -> Session {
    Session::open_with(
        storage.clone(),
        SessionOptions {
            save_debounce: Duration::from_millis(0),
        },
    )
}

#[test]
fn test_recitation_auto_advances_through_a_short_chapter() {
    let session = instant_session(&Storage::memory());
    let device = SimDevice::new();
    let handle = device.handle();
    let coordinator = Coordinator::new(session.audio(), Box::new(device), Box::new(LogNotifier));

    let audio = session.audio();
    // Surah Al-Asr: three verses.
    audio.play(103, 1, Some(3));

    let mut rounds = 0;
    while audio.state().current_verse.is_some() {
        let generation = handle
            .last_load_generation()
            .expect("Should have loaded a source before it can end");
        handle.emit_ended(generation);
        coordinator.pump_events();

        rounds += 1;
        assert!(rounds <= 4, "Playback should stop after the final verse");
    }

    let loads: Vec<String> = handle
        .commands()
        .iter()
        .filter_map(|command| match command {
            DeviceCommand::Load { url, .. } => Some(url.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        loads,
        vec![
            "https://everyayah.com/data/Alafasy_128kbps/103001.mp3".to_string(),
            "https://everyayah.com/data/Alafasy_128kbps/103002.mp3".to_string(),
            "https://everyayah.com/data/Alafasy_128kbps/103003.mp3".to_string(),
        ]
    );
    assert_eq!(audio.state().phase(), PlaybackPhase::Stopped);
}

#[test]
fn test_preferences_changed_mid_playback_survive_reopen() {
    let storage = Storage::memory();
    {
        let session = instant_session(&storage);
        let device = SimDevice::new();
        let handle = device.handle();
        let _coordinator =
            Coordinator::new(session.audio(), Box::new(device), Box::new(LogNotifier));

        let audio = session.audio();
        audio.play(2, 255, Some(286));
        audio.set_volume(0.5);
        audio.set_reciter("3");

        // The reciter change retargets the device mid-verse.
        let reload = handle.commands().into_iter().rev().find_map(|c| match c {
            DeviceCommand::Load { url, .. } => Some(url),
            _ => None,
        });
        assert_eq!(
            reload.as_deref(),
            Some("https://everyayah.com/data/Nasser_Alqatami_128kbps/002255.mp3")
        );
        session.flush();
    }

    let session = instant_session(&storage);
    let state = session.audio().state();
    assert_eq!(state.phase(), PlaybackPhase::Stopped);
    assert_eq!(state.reciter_id, "3");
    assert_eq!(state.volume, 0.5);
}

#[test]
fn test_session_stays_usable_after_a_device_error() {
    let session = instant_session(&Storage::memory());
    let device = SimDevice::new();
    let handle = device.handle();
    let coordinator = Coordinator::new(session.audio(), Box::new(device), Box::new(LogNotifier));

    let audio = session.audio();
    audio.play(1, 1, Some(7));
    handle.emit_error(
        handle.last_load_generation().expect("Should have loaded"),
        DeviceErrorKind::Network,
        "connection reset",
    );
    coordinator.pump_events();

    assert_eq!(audio.state().phase(), PlaybackPhase::Stopped);

    // With nothing loaded the toggle has nothing to resume.
    audio.toggle_play();
    assert_eq!(audio.state().phase(), PlaybackPhase::Stopped);

    // An explicit play gets playback going again.
    handle.clear_commands();
    audio.play(1, 1, None);
    assert_eq!(audio.state().current_verse, Some(VerseKey::new(1, 1)));
    assert!(handle.commands().contains(&DeviceCommand::Play));
}

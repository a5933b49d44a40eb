//! Interactive recitation player.
//!
//! A line-command shell over the audio store: every command lands as an
//! ordinary store action, the playback coordinator reconciles a logging
//! device against the result, and the status line reads back whatever the
//! store now says. No real audio backend is wired up, so `end` stands in
//! for a track finishing.

use anyhow::{Context, Result};
use console::style;
use crossbeam_channel::{unbounded, Receiver, Sender};
use mushaf_content::ContentClient;
use mushaf_core::{AudioState, PlaybackPhase, RepeatMode};
use mushaf_player::{
    recitation_url, Coordinator, DeviceEvent, Notifier, PlaybackDevice, PlayerResult, RECITERS,
};
use mushaf_session::Session;
use mushaf_storage::Storage;
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

/// Device that narrates transport commands through the logger instead of
/// producing sound. Completion is driven by the shell's `end` command.
struct ShellDevice {
    generation: Rc<Cell<u64>>,
    event_tx: Sender<DeviceEvent>,
    event_rx: Receiver<DeviceEvent>,
}

impl ShellDevice {
    fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            generation: Rc::new(Cell::new(0)),
            event_tx,
            event_rx,
        }
    }

    /// Shared view for finishing the current track after the device itself
    /// has moved into the coordinator.
    fn tracker(&self) -> TrackEnd {
        TrackEnd {
            generation: Rc::clone(&self.generation),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl PlaybackDevice for ShellDevice {
    fn load(&mut self, url: &str, generation: u64) -> PlayerResult<()> {
        self.generation.set(generation);
        log::info!("Loading {url}");
        Ok(())
    }

    fn play(&mut self) -> PlayerResult<()> {
        log::info!("Playing");
        Ok(())
    }

    fn pause(&mut self) -> PlayerResult<()> {
        log::info!("Paused");
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> PlayerResult<()> {
        log::debug!("Volume set to {volume:.2}");
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> PlayerResult<()> {
        log::debug!("Speed set to {speed:.2}");
        Ok(())
    }

    fn events(&self) -> Receiver<DeviceEvent> {
        self.event_rx.clone()
    }
}

/// Emits the end-of-track event for whatever the device last loaded.
struct TrackEnd {
    generation: Rc<Cell<u64>>,
    event_tx: Sender<DeviceEvent>,
}

impl TrackEnd {
    /// False when nothing has been loaded yet.
    fn finish(&self) -> bool {
        let generation = self.generation.get();
        if generation == 0 {
            return false;
        }
        let _ = self.event_tx.send(DeviceEvent::Ended { generation });
        true
    }
}

struct ShellNotifier;

impl Notifier for ShellNotifier {
    fn notify_error(&self, message: &str) {
        eprintln!("{} {message}", style("✗").red().bold());
    }

    fn notify_success(&self, message: &str) {
        println!("{} {message}", style("✓").green().bold());
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Play { chapter: u16, verse: u16 },
    Pause,
    Resume,
    Stop,
    Next,
    Previous,
    Speed(f32),
    /// Percent, 0-100.
    Volume(f32),
    Reciter(Option<String>),
    Repeat(Option<RepeatMode>),
    Auto(bool),
    End,
    Status,
    Help,
    Quit,
}

/// One shell line to a command. `Ok(None)` is a blank line; `Err` carries
/// the usage hint to print.
fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    let command = match word {
        "play" => match rest.as_slice() {
            [chapter, verse] => {
                let chapter: u16 = chapter
                    .parse()
                    .map_err(|_| format!("'{chapter}' is not a chapter number"))?;
                let verse: u16 = verse
                    .parse()
                    .map_err(|_| format!("'{verse}' is not a verse number"))?;
                if chapter == 0 || verse == 0 {
                    return Err("Chapter and verse numbers start at 1".to_string());
                }
                ShellCommand::Play { chapter, verse }
            }
            _ => return Err("Usage: play <chapter> <verse>".to_string()),
        },
        "pause" => ShellCommand::Pause,
        "resume" => ShellCommand::Resume,
        "stop" => ShellCommand::Stop,
        "next" | "n" => ShellCommand::Next,
        "prev" | "previous" => ShellCommand::Previous,
        "speed" => match rest.as_slice() {
            [value] => ShellCommand::Speed(
                value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a speed"))?,
            ),
            _ => return Err("Usage: speed <0.25-2.0>".to_string()),
        },
        "volume" | "vol" => match rest.as_slice() {
            [value] => ShellCommand::Volume(
                value
                    .parse()
                    .map_err(|_| format!("'{value}' is not a volume"))?,
            ),
            _ => return Err("Usage: volume <0-100>".to_string()),
        },
        "reciter" => ShellCommand::Reciter(rest.first().map(|s| s.to_string())),
        "repeat" => match rest.as_slice() {
            [] => ShellCommand::Repeat(None),
            [mode] => ShellCommand::Repeat(Some(mode.parse()?)),
            _ => return Err("Usage: repeat [none|verse|chapter]".to_string()),
        },
        "auto" => match rest.as_slice() {
            ["on"] => ShellCommand::Auto(true),
            ["off"] => ShellCommand::Auto(false),
            _ => return Err("Usage: auto <on|off>".to_string()),
        },
        "end" => ShellCommand::End,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Run the shell until `quit` or end of input.
pub async fn run_shell(storage: &Storage) -> Result<()> {
    let session = Session::open(storage.clone());
    let audio = session.audio();

    let device = ShellDevice::new();
    let track_end = device.tracker();
    let coordinator = Coordinator::new(
        Rc::clone(&audio),
        Box::new(device),
        Box::new(ShellNotifier),
    );

    // Chapter verse counts come from the content API. Playing without it
    // still works, but end-of-verse can only stop, never advance.
    let client = match ContentClient::new() {
        Ok(client) => Some(client),
        Err(e) => {
            log::warn!("Content client unavailable ({e}); verse counts unknown");
            None
        }
    };

    println!("\n{}", style("Recitation Player").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Type 'help' for commands, 'quit' to leave.");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} ", style("player>").dim());
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = stdin.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            break;
        }

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                dispatch(command, &session, &track_end, client.as_ref()).await;
                coordinator.pump_events();
                print_status_line(&audio.state());
            }
            Err(usage) => println!("{usage}"),
        }
    }

    session.flush();
    Ok(())
}

async fn dispatch(
    command: ShellCommand,
    session: &Session,
    track_end: &TrackEnd,
    client: Option<&ContentClient>,
) {
    let audio = session.audio();
    match command {
        ShellCommand::Play { chapter, verse } => {
            let total = fetch_verse_count(client, chapter).await;
            audio.play(chapter, verse, total);
        }
        ShellCommand::Pause => audio.pause(),
        ShellCommand::Resume => match audio.state().phase() {
            PlaybackPhase::Paused => audio.toggle_play(),
            PlaybackPhase::Playing => println!("Already playing."),
            PlaybackPhase::Stopped => {
                println!("Nothing to resume; use 'play <chapter> <verse>'.")
            }
        },
        ShellCommand::Stop => audio.stop(),
        ShellCommand::Next => {
            let state = audio.state();
            if state.current_verse.is_none() {
                println!("Nothing is playing.");
            } else {
                audio.next_verse(state.total_verses_in_chapter);
            }
        }
        ShellCommand::Previous => audio.previous_verse(),
        ShellCommand::Speed(speed) => audio.set_playback_speed(speed),
        ShellCommand::Volume(percent) => audio.set_volume(percent / 100.0),
        ShellCommand::Reciter(None) => print_reciters(&audio.state().reciter_id),
        ShellCommand::Reciter(Some(id)) => {
            if RECITERS.iter().all(|r| r.id != id) {
                println!("Unknown reciter id '{id}'; playback falls back to the default voice.");
            }
            audio.set_reciter(id);
        }
        ShellCommand::Repeat(None) => println!("Repeat: {}", audio.state().repeat_mode),
        ShellCommand::Repeat(Some(mode)) => audio.set_repeat_mode(mode),
        ShellCommand::Auto(on) => audio.set_auto_play_next(on),
        ShellCommand::End => {
            if !track_end.finish() {
                println!("Nothing is playing.");
            }
        }
        ShellCommand::Status => print_status(&audio.state()),
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
}

/// Verse count for boundary decisions, `None` when the API is unreachable.
async fn fetch_verse_count(client: Option<&ContentClient>, chapter: u16) -> Option<u16> {
    let client = client?;
    match client.chapter(chapter).await {
        Ok(detail) => Some(detail.verse_count),
        Err(e) => {
            log::warn!("Could not fetch chapter {chapter} ({e}); end-of-verse will stop playback");
            None
        }
    }
}

fn print_status_line(state: &AudioState) {
    let phase = match state.phase() {
        PlaybackPhase::Playing => style("playing").green(),
        PlaybackPhase::Paused => style("paused").yellow(),
        PlaybackPhase::Stopped => style("stopped").dim(),
    };
    let verse = state
        .current_verse
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {phase} {verse} | speed {:.2}x | volume {:.0}% | repeat {} | auto {}",
        state.playback_speed,
        state.volume * 100.0,
        state.repeat_mode,
        if state.auto_play_next { "on" } else { "off" },
    );
}

fn print_status(state: &AudioState) {
    println!("\n{}", style("Player Status").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Phase: {}", state.phase());
    match state.current_verse {
        Some(verse) => {
            println!("Verse: {verse}");
            println!("Source: {}", recitation_url(verse, &state.reciter_id));
        }
        None => println!("Verse: none"),
    }
    let reciter_name = RECITERS
        .iter()
        .find(|r| r.id == state.reciter_id)
        .map(|r| r.name)
        .unwrap_or("Unknown (default voice)");
    println!("Reciter: {reciter_name} ({})", state.reciter_id);
    println!("Speed: {:.2}x", state.playback_speed);
    println!("Volume: {:.0}%", state.volume * 100.0);
    println!("Repeat: {}", state.repeat_mode);
    println!(
        "Autoplay: {}",
        if state.auto_play_next { "on" } else { "off" }
    );
    if state.total_verses_in_chapter > 0 {
        println!("Chapter length: {} verses", state.total_verses_in_chapter);
    }
}

fn print_reciters(current_id: &str) {
    for reciter in RECITERS {
        if reciter.id == current_id {
            println!(
                "{:>3}  {} {}",
                reciter.id,
                reciter.name,
                style("(current)").green()
            );
        } else {
            println!("{:>3}  {}", reciter.id, reciter.name);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  play <chapter> <verse>   Start reciting a verse");
    println!("  pause / resume / stop    Transport control");
    println!("  next / prev              Move between verses");
    println!("  speed <0.25-2.0>         Playback speed");
    println!("  volume <0-100>           Playback volume");
    println!("  reciter [id]             Show voices, or switch voice");
    println!("  repeat [none|verse|chapter]");
    println!("  auto <on|off>            Continue after a verse ends");
    println!("  end                      Simulate the current verse finishing");
    println!("  status                   Full player state");
    println!("  quit");
}

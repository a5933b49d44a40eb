//! Playback device contract and the simulated device.
//!
//! The real audio output is an external collaborator; everything here talks
//! to it through [`PlaybackDevice`]. Completion and failure arrive
//! asynchronously on an event channel, each event stamped with the
//! generation of the load it belongs to, so events from a superseded source
//! can be told apart from current ones.

use crate::error::PlayerResult;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::cell::RefCell;
use std::rc::Rc;

/// Why a device load or playback failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    /// The load was interrupted, typically by a newer load. Benign.
    Aborted,
    Network,
    Decode,
    Unsupported,
}

/// Asynchronous device reports, stamped with the load generation.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The current source played to its end.
    Ended { generation: u64 },
    Error {
        generation: u64,
        kind: DeviceErrorKind,
        message: String,
    },
}

/// One playback device: a single source slot plus transport controls.
///
/// Command methods are synchronous and cheap; real work completes through
/// the event channel. After an `Ended` event the source stays loaded and a
/// later `play()` restarts it from the beginning.
pub trait PlaybackDevice {
    /// Replaces the loaded source. The device starts paused on the new
    /// source; events for it carry `generation`.
    fn load(&mut self, url: &str, generation: u64) -> PlayerResult<()>;

    fn play(&mut self) -> PlayerResult<()>;

    fn pause(&mut self) -> PlayerResult<()>;

    fn set_volume(&mut self, volume: f32) -> PlayerResult<()>;

    fn set_speed(&mut self, speed: f32) -> PlayerResult<()>;

    /// The device's event stream. Receivers are clones of one channel; the
    /// coordinator drains it on the session thread.
    fn events(&self) -> Receiver<DeviceEvent>;
}

/// Commands a [`SimDevice`] has received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Load { url: String, generation: u64 },
    Play,
    Pause,
    SetVolume(f32),
    SetSpeed(f32),
}

/// Scriptable in-memory device for tests and the demo shell.
///
/// Records every command and emits events only when told to, so tests can
/// drive completion and failure deterministically.
pub struct SimDevice {
    commands: Rc<RefCell<Vec<DeviceCommand>>>,
    event_tx: Sender<DeviceEvent>,
    event_rx: Receiver<DeviceEvent>,
}

impl SimDevice {
    pub fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            commands: Rc::new(RefCell::new(Vec::new())),
            event_tx,
            event_rx,
        }
    }

    /// A handle for inspecting commands and injecting events after the
    /// device itself has been handed to a coordinator.
    pub fn handle(&self) -> SimHandle {
        SimHandle {
            commands: Rc::clone(&self.commands),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl Default for SimDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDevice for SimDevice {
    fn load(&mut self, url: &str, generation: u64) -> PlayerResult<()> {
        self.commands.borrow_mut().push(DeviceCommand::Load {
            url: url.to_string(),
            generation,
        });
        Ok(())
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.commands.borrow_mut().push(DeviceCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> PlayerResult<()> {
        self.commands.borrow_mut().push(DeviceCommand::Pause);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> PlayerResult<()> {
        self.commands
            .borrow_mut()
            .push(DeviceCommand::SetVolume(volume));
        Ok(())
    }

    fn set_speed(&mut self, speed: f32) -> PlayerResult<()> {
        self.commands
            .borrow_mut()
            .push(DeviceCommand::SetSpeed(speed));
        Ok(())
    }

    fn events(&self) -> Receiver<DeviceEvent> {
        self.event_rx.clone()
    }
}

/// Test-side view of a [`SimDevice`].
#[derive(Clone)]
pub struct SimHandle {
    commands: Rc<RefCell<Vec<DeviceCommand>>>,
    event_tx: Sender<DeviceEvent>,
}

impl SimHandle {
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.commands.borrow().clone()
    }

    /// Forgets recorded commands; the next assertion starts clean.
    pub fn clear_commands(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Generation of the most recent load, if any.
    pub fn last_load_generation(&self) -> Option<u64> {
        self.commands.borrow().iter().rev().find_map(|c| match c {
            DeviceCommand::Load { generation, .. } => Some(*generation),
            _ => None,
        })
    }

    pub fn emit_ended(&self, generation: u64) {
        let _ = self.event_tx.send(DeviceEvent::Ended { generation });
    }

    pub fn emit_error(&self, generation: u64, kind: DeviceErrorKind, message: &str) {
        let _ = self.event_tx.send(DeviceEvent::Error {
            generation,
            kind,
            message: message.to_string(),
        });
    }
}

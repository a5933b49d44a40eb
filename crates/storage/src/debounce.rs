//! Trailing-edge debouncing for persistence writes.
//!
//! Stores notify on every mutation, but a burst of mutations should land on
//! disk as one write carrying the final state. Each [`Debouncer`] owns a
//! worker thread that coalesces incoming values and runs its action once the
//! quiet window elapses.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

enum Command<T> {
    Update(T),
    Flush(Sender<()>),
    Shutdown,
}

/// Runs an action with the most recent value after `wait` of quiet.
///
/// Intermediate values are replaced, never queued, so the action observes
/// only the last value of a burst. Dropping the debouncer flushes any
/// pending value before the worker exits.
pub struct Debouncer<T: Send + 'static> {
    command_tx: Sender<Command<T>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (command_tx, command_rx) = unbounded();
        let handle = thread::spawn(move || debounce_loop(command_rx, wait, action));
        Self {
            command_tx,
            handle: Some(handle),
        }
    }

    /// Replaces the pending value and restarts the quiet window. Never
    /// blocks the caller.
    pub fn call(&self, value: T) {
        let _ = self.command_tx.send(Command::Update(value));
    }

    /// Runs the action now if a value is pending, and blocks until it has
    /// finished. A flush with nothing pending is a no-op.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        if self.command_tx.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let _ = self.command_tx.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn debounce_loop<T, F>(command_rx: Receiver<Command<T>>, wait: Duration, mut action: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let command = match deadline {
            Some(due) => {
                let remaining = due.saturating_duration_since(Instant::now());
                match command_rx.recv_timeout(remaining) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match command_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(Command::Update(value)) => {
                pending = Some(value);
                deadline = Some(Instant::now() + wait);
            }
            Some(Command::Flush(ack_tx)) => {
                if let Some(value) = pending.take() {
                    action(value);
                }
                deadline = None;
                let _ = ack_tx.send(());
            }
            Some(Command::Shutdown) => break,
            // Quiet window elapsed
            None => {
                if let Some(value) = pending.take() {
                    action(value);
                }
                deadline = None;
            }
        }
    }

    // Shutdown or sender gone; run the tail write instead of losing it.
    if let Some(value) = pending.take() {
        action(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_sink() -> (Arc<Mutex<Vec<i32>>>, impl FnMut(i32) + Send + 'static) {
        let written: Arc<Mutex<Vec<i32>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let written = Arc::clone(&written);
            move |value| written.lock().expect("Sink lock").push(value)
        };
        (written, sink)
    }

    #[test]
    fn test_burst_coalesces_to_last_value() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.call(1);
        debouncer.call(2);
        debouncer.call(3);
        debouncer.flush();

        assert_eq!(*written.lock().expect("Lock"), vec![3]);
    }

    #[test]
    fn test_action_fires_after_quiet_window() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_millis(20), sink);

        debouncer.call(7);
        thread::sleep(Duration::from_millis(300));

        assert_eq!(*written.lock().expect("Lock"), vec![7]);
        drop(debouncer);
        // The value already fired; drop must not replay it.
        assert_eq!(*written.lock().expect("Lock"), vec![7]);
    }

    #[test]
    fn test_flush_without_pending_is_noop() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_millis(20), sink);

        debouncer.flush();
        assert!(written.lock().expect("Lock").is_empty());
    }

    #[test]
    fn test_drop_flushes_pending_value() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.call(42);
        drop(debouncer);

        assert_eq!(*written.lock().expect("Lock"), vec![42]);
    }

    #[test]
    fn test_separate_bursts_each_write() {
        let (written, sink) = recording_sink();
        let debouncer = Debouncer::new(Duration::from_secs(60), sink);

        debouncer.call(1);
        debouncer.flush();
        debouncer.call(2);
        debouncer.call(3);
        debouncer.flush();

        assert_eq!(*written.lock().expect("Lock"), vec![1, 3]);
    }
}

//! Observable state container.
//!
//! The session's reactive primitive: one immutable state value, replaced
//! wholesale by updates and broadcast synchronously to subscribers. Stores
//! are single-threaded by construction (`Rc` inside, so `!Send`); the rest
//! of the session builds on that assumption and stays lock-free.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Listener<S> = Rc<dyn Fn(&S)>;
type ListenerList<S> = Rc<RefCell<Vec<(u64, Listener<S>)>>>;

/// Holder of one state value plus its subscribers.
///
/// `set` replaces the whole value and notifies every subscriber on the
/// calling thread before returning. Listeners receive the state current at
/// their own call time, so a listener that mutates the store mid-broadcast
/// never causes a later listener to observe a stale value.
pub struct Store<S: Clone> {
    state: RefCell<S>,
    listeners: ListenerList<S>,
    next_id: Cell<u64>,
}

impl<S: Clone> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: RefCell::new(initial),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> S {
        self.state.borrow().clone()
    }

    /// Runs a selector against the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Computes the next state from the previous one, commits it, then
    /// notifies subscribers. No batching: every `set` broadcasts.
    pub fn set(&self, update: impl FnOnce(&S) -> S) {
        let next = {
            let prev = self.state.borrow();
            update(&prev)
        };
        *self.state.borrow_mut() = next;
        self.notify();
    }

    /// Registers a listener, returning a guard that unsubscribes on drop.
    ///
    /// Listeners added or removed during a broadcast take effect from the
    /// next broadcast; dispatch iterates a snapshot of this list.
    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(listener) as Listener<S>));

        let weak: Weak<RefCell<Vec<(u64, Listener<S>)>>> = Rc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        let snapshot: Vec<Listener<S>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            // Each listener sees the state as of its own call, cloned out so
            // a nested `set` inside the listener cannot hit a live borrow.
            let state = self.state.borrow().clone();
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(&state))) {
                log::error!("Store listener panicked: {}", panic_message(&payload));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// RAII guard for a store subscription.
///
/// Dropping it removes the listener; [`Subscription::detach`] instead keeps
/// the listener alive for the store's whole lifetime.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Consumes the guard without unsubscribing.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

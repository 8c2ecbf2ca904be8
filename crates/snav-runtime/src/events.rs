#![forbid(unsafe_code)]

//! Synchronous event bus for navigation changes.
//!
//! # Design
//!
//! [`EventBus`] is a cheap handle (`Rc<RefCell<..>>`) to a listener list.
//! Cloning it yields another handle to the same list, so a listener can hold
//! a handle and subscribe or unsubscribe from inside a callback.
//!
//! `emit` snapshots the listener list before calling anyone and releases its
//! borrow while callbacks run:
//!
//! - listeners added during an emission are first called on the next one;
//! - listeners removed during an emission are not called again, even later
//!   in the same round;
//! - every other listener is called exactly once, in subscription order.
//!
//! # Failure Modes
//!
//! - **Leaked handles**: dropping an [`Unsubscribe`] without calling it keeps
//!   the listener registered for the lifetime of the bus.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use snav_core::State;

/// What kind of transition produced an emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterEvent {
    /// A new entry was pushed (programmatically or by native forward).
    Push,
    /// The current entry was replaced.
    Replace,
    /// A native back transition was applied.
    Back,
    /// The address changed outside the navigator's control; state is `None`.
    Update,
}

impl fmt::Display for RouterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Push => "PUSH",
            Self::Replace => "REPLACE",
            Self::Back => "BACK",
            Self::Update => "UPDATE",
        })
    }
}

type ListenerRc = Rc<dyn Fn(RouterEvent, Option<&State>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(ListenerId, ListenerRc)>,
}

impl BusInner {
    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(other, _)| *other == id)
    }
}

/// Shared handle to a listener list.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Call [`Unsubscribe::unsubscribe`] on the returned
    /// handle to remove it.
    pub fn subscribe(&self, listener: impl Fn(RouterEvent, Option<&State>) + 'static) -> Unsubscribe {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Unsubscribe {
            bus: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Call every registered listener with `event` and `state`.
    pub fn emit(&self, event: RouterEvent, state: Option<&State>) {
        let snapshot: Vec<(ListenerId, ListenerRc)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if self.inner.borrow().is_registered(id) {
                listener(event, state);
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Handle that removes one listener.
pub struct Unsubscribe {
    bus: Weak<RefCell<BusInner>>,
    id: ListenerId,
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id.0).finish()
    }
}

impl Unsubscribe {
    /// Remove the listener. A no-op if the bus is gone.
    pub fn unsubscribe(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

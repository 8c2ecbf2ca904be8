#![forbid(unsafe_code)]
#![doc = "Backend traits for stacknav: native history, popstate delivery, and host bridge."]
#![doc = ""]
#![doc = "This crate defines the boundary between the navigation runtime and the"]
#![doc = "platform that owns the real history stack (a browser, a webview host, or"]
#![doc = "the in-memory simulation in `snav-web`)."]

use serde::Deserialize;
use snav_core::{State, Style};

/// Native history API: the persisted half of the boundary.
///
/// Every entry persists the [`State`] verbatim so back/forward can restore it
/// without re-resolving the path.
pub trait HistoryBackend {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Append a new entry after the current one, discarding forward entries.
    fn push_state(&mut self, state: &State, url: &str) -> Result<(), Self::Error>;

    /// Overwrite the current entry.
    fn replace_state(&mut self, state: &State, url: &str) -> Result<(), Self::Error>;

    /// Move `delta` entries through the stack.
    ///
    /// The move is asynchronous: its outcome arrives later as a
    /// [`PopState`] notification, if at all. Moves past either end are
    /// silently ignored by the platform.
    fn go(&mut self, delta: i32) -> Result<(), Self::Error>;
}

/// A native "history position changed" notification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopState {
    /// The payload of the entry now current. `None` when the entry was not
    /// created by the navigator (e.g. a hash edit in the address bar).
    pub payload: Option<serde_json::Value>,
}

impl PopState {
    #[must_use]
    pub fn new(payload: Option<serde_json::Value>) -> Self {
        Self { payload }
    }

    /// Decode the payload as a [`State`]. Malformed payloads decode to `None`.
    #[must_use]
    pub fn state(&self) -> Option<State> {
        self.payload
            .as_ref()
            .filter(|v| !v.is_null())
            .and_then(|v| State::deserialize(v).ok())
    }
}

/// Source of popstate notifications, drained by the host loop.
pub trait PopStateSource {
    /// Take the next pending notification, if any. Never blocks.
    fn poll_popstate(&mut self) -> Option<PopState>;
}

/// Host-application bridge: the platform outside the history stack.
pub trait HostBridge {
    /// Whether the page runs embedded in a host application.
    fn is_embedded(&self) -> bool;

    /// Whether the host accepts a close request.
    fn supports_close(&self) -> bool;

    /// Ask the host to terminate. Fire-and-forget, never retried.
    fn close(&mut self);

    /// Presentation style the host wants, if it knows.
    fn preferred_style(&self) -> Option<Style> {
        None
    }
}

/// Bridge for pages that run standalone: not embedded, cannot close.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBridge;

impl HostBridge for NullBridge {
    fn is_embedded(&self) -> bool {
        false
    }

    fn supports_close(&self) -> bool {
        false
    }

    fn close(&mut self) {}
}

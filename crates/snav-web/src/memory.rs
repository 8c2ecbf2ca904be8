#![forbid(unsafe_code)]

//! In-memory model of a browser history stack.
//!
//! [`MemoryHistory`] behaves like `window.history` for a single document:
//!
//! - `push_state` discards every entry after the cursor, appends, and moves
//!   the cursor onto the new entry. No notification is queued.
//! - `replace_state` overwrites the entry under the cursor.
//! - `go(delta)` moves the cursor and queues one [`PopState`] carrying the
//!   payload of the entry now current. Moves past either end do nothing.
//!
//! Notifications are never delivered synchronously; the host drains them
//! through [`PopStateSource::poll_popstate`], which mirrors the browser
//! firing `popstate` on a later turn.
//!
//! User chrome actions ([`MemoryHistory::press_back`],
//! [`MemoryHistory::press_forward`]) and address-bar edits
//! ([`MemoryHistory::edit_url`]) are modelled too, so scenarios can mix
//! programmatic calls with things only the user can do.

use std::collections::VecDeque;
use std::fmt;

use serde_json::Value;
use snav_backend::{HistoryBackend, PopState, PopStateSource};
use snav_core::State;

/// Failure persisting a state payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryHistoryError {
    /// The state could not be serialized.
    Payload(String),
}

impl fmt::Display for MemoryHistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(msg) => write!(f, "cannot persist state: {msg}"),
        }
    }
}

impl std::error::Error for MemoryHistoryError {}

/// One native history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Persisted payload; `None` for entries the navigator did not create.
    pub payload: Option<Value>,
    pub url: String,
}

/// Host-driven history stack with a queue of pending popstates.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Entry>,
    cursor: usize,
    pending: VecDeque<PopState>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryHistory {
    /// A history holding the page's initial entry at `url`, without payload.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: vec![Entry {
                payload: None,
                url: url.into(),
            }],
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the initial entry is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> &Entry {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.current().url
    }

    /// Decoded payload of the current entry.
    #[must_use]
    pub fn current_state(&self) -> Option<State> {
        PopState::new(self.current().payload.clone()).state()
    }

    #[must_use]
    pub fn pending_popstates(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// The browser's back button. Returns whether the cursor moved.
    pub fn press_back(&mut self) -> bool {
        self.traverse(-1)
    }

    /// The browser's forward button. Returns whether the cursor moved.
    pub fn press_forward(&mut self) -> bool {
        self.traverse(1)
    }

    /// Type a new fragment or path into the address bar.
    ///
    /// Creates an entry without payload and queues a popstate for it, the
    /// way a same-document hash change does.
    pub fn edit_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(url = %url, "address bar edit");
        self.append(Entry { payload: None, url });
        self.pending.push_back(PopState::new(None));
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn append(&mut self, entry: Entry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    fn traverse(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }
        let target = self.cursor as i64 + i64::from(delta);
        if target < 0 || target >= self.entries.len() as i64 {
            #[cfg(feature = "tracing")]
            tracing::trace!(delta, cursor = self.cursor, "history move out of range ignored");
            return false;
        }
        self.cursor = target as usize;
        let payload = self.entries[self.cursor].payload.clone();
        self.pending.push_back(PopState::new(payload));
        true
    }

    /// An empty URL keeps the current one, as `history.pushState(s, "", "")`
    /// does.
    fn effective_url(&self, url: &str) -> String {
        if url.is_empty() {
            self.current_url().to_owned()
        } else {
            url.to_owned()
        }
    }
}

fn persist(state: &State) -> Result<Value, MemoryHistoryError> {
    serde_json::to_value(state).map_err(|e| MemoryHistoryError::Payload(e.to_string()))
}

impl HistoryBackend for MemoryHistory {
    type Error = MemoryHistoryError;

    fn push_state(&mut self, state: &State, url: &str) -> Result<(), Self::Error> {
        let payload = persist(state)?;
        let url = self.effective_url(url);
        #[cfg(feature = "tracing")]
        tracing::trace!(url = %url, "pushState");
        self.append(Entry {
            payload: Some(payload),
            url,
        });
        Ok(())
    }

    fn replace_state(&mut self, state: &State, url: &str) -> Result<(), Self::Error> {
        let payload = persist(state)?;
        let url = self.effective_url(url);
        #[cfg(feature = "tracing")]
        tracing::trace!(url = %url, "replaceState");
        self.entries[self.cursor] = Entry {
            payload: Some(payload),
            url,
        };
        Ok(())
    }

    fn go(&mut self, delta: i32) -> Result<(), Self::Error> {
        self.traverse(delta);
        Ok(())
    }
}

impl PopStateSource for MemoryHistory {
    fn poll_popstate(&mut self) -> Option<PopState> {
        self.pending.pop_front()
    }
}

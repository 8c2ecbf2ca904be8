#![forbid(unsafe_code)]

//! History store: the navigator's mirror of the native history stack.
//!
//! [`HistoryStore`] keeps two stacks in lockstep:
//!
//! - the **entry stack** of every [`State`] the user can go back to, and
//! - the **swipeback stack** of panel ids scoped to the current view, used
//!   for intra-view back gestures.
//!
//! # Invariants
//!
//! 1. The entry stack is never empty; its top is the current state.
//! 2. The swipeback stack is never empty; its top is the current panel.
//! 3. When a transition changes the view, the swipeback stack becomes
//!    `[new panel]`. Otherwise a single step grows or shrinks it by one
//!    (replace keeps its length).
//!
//! ```text
//! push(/a/x)  push(/a/y)   push(/b/z)   back → /a/y
//! [x]         [x, y]       [z]          [y]
//! ```

use std::fmt;

use snav_core::{NavId, State, StateId};

/// Ordered stack of visited states plus the per-view swipeback stack.
#[derive(Clone)]
pub struct HistoryStore {
    stack: Vec<State>,
    swipeback: Vec<NavId>,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("depth", &self.stack.len())
            .field("current", &self.current().path)
            .field("swipeback", &self.swipeback)
            .finish()
    }
}

impl HistoryStore {
    /// Start a store holding only `initial`.
    #[must_use]
    pub fn new(initial: State) -> Self {
        let swipeback = vec![initial.panel.clone()];
        Self {
            stack: vec![initial],
            swipeback,
        }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: State) {
        self.swipeback = vec![initial.panel.clone()];
        self.stack = vec![initial];
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The state on top of the stack.
    #[must_use]
    pub fn current(&self) -> &State {
        // Never empty: every mutation keeps at least one entry.
        &self.stack[self.stack.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Entries from oldest to newest.
    #[must_use]
    pub fn entries(&self) -> &[State] {
        &self.stack
    }

    /// Panel ids of the current view, oldest first.
    #[must_use]
    pub fn swipeback(&self) -> &[NavId] {
        &self.swipeback
    }

    #[must_use]
    pub fn contains(&self, id: StateId) -> bool {
        self.position(id).is_some()
    }

    /// Index of the entry carrying `id`, searching from the top.
    #[must_use]
    pub fn position(&self, id: StateId) -> Option<usize> {
        self.stack.iter().rposition(|s| s.id == Some(id))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append `state` as the new top.
    pub fn push(&mut self, state: State) {
        if self.current().view == state.view {
            self.swipeback.push(state.panel.clone());
        } else {
            self.swipeback = vec![state.panel.clone()];
        }
        self.stack.push(state);
    }

    /// Overwrite the top entry with `state`.
    pub fn replace_top(&mut self, state: State) {
        if self.current().view == state.view {
            if let Some(last) = self.swipeback.last_mut() {
                *last = state.panel.clone();
            }
        } else {
            self.swipeback = vec![state.panel.clone()];
        }
        let top = self.stack.len() - 1;
        self.stack[top] = state;
    }

    /// Pop every entry above the one carrying `id` and return how many were
    /// removed. Returns `None` when `id` is unknown.
    ///
    /// Returns `Some(0)` when `id` is already the top; the stack never
    /// shrinks below one entry.
    pub fn pop_to(&mut self, id: StateId) -> Option<usize> {
        let index = self.position(id)?;
        let popped = self.stack.len() - (index + 1);
        if popped == 0 {
            return Some(0);
        }

        let previous_view = self.current().view.clone();
        self.stack.truncate(index + 1);
        let restored = self.current();
        let same_view = restored.view == previous_view;
        let restored_panel = restored.panel.clone();

        if same_view {
            let keep = self.swipeback.len().saturating_sub(popped).max(1);
            self.swipeback.truncate(keep);
            if let Some(last) = self.swipeback.last_mut()
                && *last != restored_panel
            {
                *last = restored_panel;
            }
        } else {
            self.swipeback = vec![restored_panel];
        }
        Some(popped)
    }
}

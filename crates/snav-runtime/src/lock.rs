#![forbid(unsafe_code)]

//! Lock gate: navigation suppression.
//!
//! | Mode            | Programmatic calls | Native back/forward          |
//! |-----------------|--------------------|------------------------------|
//! | `Unlocked`      | allowed            | allowed                      |
//! | `PopstateOnly`  | allowed            | cancelled unless we caused it |
//! | `All`           | dropped            | cancelled                    |
//!
//! The gate also carries the two one-shot markers the popstate reconciler
//! needs:
//!
//! - **internal**: set by the navigator's own `back`/`forward`/`go`, so the
//!   next reconciliation knows it was not a browser-chrome action;
//! - **skip**: set when the reconciler injects a counter-navigation to undo
//!   a blocked action. The notification that counter-navigation produces
//!   must be consumed exactly once without emitting anything.

use std::fmt;

/// Navigation-suppression strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockMode {
    #[default]
    Unlocked,
    /// Cancel native back/forward that the navigator did not initiate.
    PopstateOnly,
    /// Drop every programmatic call and cancel every native move.
    All,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unlocked => "unlocked",
            Self::PopstateOnly => "popstate-only",
            Self::All => "all",
        })
    }
}

/// Process-wide lock state plus the reconciler's one-shot markers.
#[derive(Debug, Clone, Default)]
pub struct LockGate {
    mode: LockMode,
    internal: bool,
    skip_next: bool,
}

impl LockGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(&self) -> LockMode {
        self.mode
    }

    /// Takes effect for the next navigation event.
    pub fn lock(&mut self, mode: LockMode) {
        self.mode = mode;
    }

    pub fn unlock(&mut self) {
        self.mode = LockMode::Unlocked;
    }

    /// Whether programmatic navigation calls are allowed.
    #[must_use]
    pub fn allows_programmatic(&self) -> bool {
        self.mode != LockMode::All
    }

    /// Whether a native move is allowed, given whether the navigator
    /// initiated it.
    #[must_use]
    pub fn allows_native(&self, internal: bool) -> bool {
        match self.mode {
            LockMode::Unlocked => true,
            LockMode::PopstateOnly => internal,
            LockMode::All => false,
        }
    }

    /// Record that the next native move was initiated by the navigator.
    pub fn mark_internal(&mut self) {
        self.internal = true;
    }

    /// Consume the internal marker.
    pub fn take_internal(&mut self) -> bool {
        std::mem::take(&mut self.internal)
    }

    /// Arm the skip marker for an injected counter-navigation.
    pub fn arm_skip(&mut self) {
        self.skip_next = true;
    }

    /// Consume the skip marker.
    pub fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip_next)
    }

    #[must_use]
    pub const fn skip_armed(&self) -> bool {
        self.skip_next
    }
}

#![forbid(unsafe_code)]

//! Internal navigation errors.
//!
//! Public navigation calls never return these: they are logged as
//! development diagnostics and dropped. The `try_*` methods on
//! [`crate::Navigator`] expose them for hosts and tests that want to know.

use std::fmt;

use snav_core::{ResolveError, StructureError};

use crate::lock::LockMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// The path could not be resolved (no structure yet).
    NotResolved(ResolveError),
    /// A lock suppressed the call.
    LockRejected(LockMode),
    /// `back` was requested on the last remaining entry.
    EmptyHistory,
    /// `forward`/`go(+n)` was requested with too few entries ahead.
    NoForwardEntry,
    /// The structure could not be installed.
    Structure(StructureError),
    /// The native history API refused the operation.
    Backend(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResolved(e) => write!(f, "not resolved: {e}"),
            Self::LockRejected(mode) => write!(f, "navigation locked ({mode})"),
            Self::EmptyHistory => f.write_str("no history entry to go back to"),
            Self::NoForwardEntry => f.write_str("no history entry to go forward to"),
            Self::Structure(e) => write!(f, "structure: {e}"),
            Self::Backend(msg) => write!(f, "history backend: {msg}"),
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotResolved(e) => Some(e),
            Self::Structure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for NavError {
    fn from(e: ResolveError) -> Self {
        Self::NotResolved(e)
    }
}

impl From<StructureError> for NavError {
    fn from(e: StructureError) -> Self {
        Self::Structure(e)
    }
}

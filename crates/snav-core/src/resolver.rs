#![forbid(unsafe_code)]

//! Path → [`State`] resolution.
//!
//! The path is split on its first `?`; the part before it is cut into
//! `/`-separated segments (empty segments dropped) and normalized to
//! leading-slash nav ids. A single root-to-leaf walk then consumes one
//! segment per level: the first segment must name a view, the second a panel
//! of that view. The root label is never consumed.
//!
//! Matching is best-effort. The walk stops at the first segment that names
//! nothing at its depth, and every field not reached keeps its `/` default.
//! A malformed or partial path therefore degrades to the default screen
//! instead of failing navigation.

use std::fmt;

use tracing::trace;

use crate::state::{Meta, State};
use crate::structure::{NavId, RootStructure};

/// Resolution failed because no structure has been installed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    MissingStructure,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStructure => {
                f.write_str("cannot resolve path: navigation structure is not initialized")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolve `path` against `structure`.
///
/// Fails only when `structure` is `None`.
pub fn resolve(
    structure: Option<&RootStructure>,
    path: &str,
    meta: Option<Meta>,
) -> Result<State, ResolveError> {
    let structure = structure.ok_or(ResolveError::MissingStructure)?;
    Ok(structure.resolve(path, meta))
}

/// Split a path into nav segments, ignoring any `?query`.
pub fn segments(path: &str) -> impl Iterator<Item = NavId> + '_ {
    let nav = path.split_once('?').map_or(path, |(nav, _)| nav);
    nav.split('/').filter(|s| !s.is_empty()).map(NavId::new)
}

impl RootStructure {
    /// Resolve `path` against this structure. Never fails.
    #[must_use]
    pub fn resolve(&self, path: &str, meta: Option<Meta>) -> State {
        let mut state = State::new(path, meta);
        let mut segs = segments(path);

        let Some(view_seg) = segs.next() else {
            return state;
        };
        let Some(view) = self.view(&view_seg) else {
            trace!(path, segment = %view_seg, "no view matches segment");
            return state;
        };
        state.view = view.nav.clone();

        let Some(panel_seg) = segs.next() else {
            return state;
        };
        match view.panel(&panel_seg) {
            Some(panel) => state.panel = panel.nav.clone(),
            None => trace!(path, segment = %panel_seg, view = %view.nav, "no panel matches segment"),
        }
        state
    }
}

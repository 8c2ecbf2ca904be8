#![forbid(unsafe_code)]

//! Navigation state: the value every history entry persists.
//!
//! A [`State`] is created by the resolver, stamped with an id by the
//! navigator, and never mutated afterwards. Replacing an entry produces a new
//! `State` that reuses the old id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::structure::NavId;

/// Opaque caller-supplied metadata carried with a state.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Query parameters parsed from the `?query` part of a path.
pub type Params = BTreeMap<String, String>;

/// Identity of one history entry within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source. Every call to [`IdGenerator::next_id`] returns a
/// value never handed out before by the same generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Start handing out ids at `seed` (clamped to at least 1).
    #[must_use]
    pub const fn starting_at(seed: u64) -> Self {
        Self {
            next: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_id(&mut self) -> StateId {
        let id = StateId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// One resolved navigation position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// The path this state was resolved from, query included.
    pub path: String,
    pub view: NavId,
    pub panel: NavId,
    /// `None` until the navigator stamps the state.
    #[serde(default)]
    pub id: Option<StateId>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub params: Params,
}

impl State {
    /// A state pointing at the default screen (`view = panel = "/"`).
    #[must_use]
    pub fn new(path: impl Into<String>, meta: Option<Meta>) -> Self {
        let path = path.into();
        let params = path
            .split_once('?')
            .map(|(_, query)| parse_query(query))
            .unwrap_or_default();
        Self {
            path,
            view: NavId::root(),
            panel: NavId::root(),
            id: None,
            meta: meta.unwrap_or_default(),
            params,
        }
    }

    /// Return a copy of this state carrying `id`.
    #[must_use]
    pub fn with_id(mut self, id: StateId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Parse an `application/x-www-form-urlencoded` query. The last value wins
/// for repeated keys.
#[must_use]
pub fn parse_query(query: &str) -> Params {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_state_defaults_to_root_screen() {
        let s = State::new("/a/x", None);
        assert!(s.view.is_root());
        assert!(s.panel.is_root());
        assert_eq!(s.id, None);
        assert!(s.meta.is_empty());
        assert!(s.params.is_empty());
    }

    #[test]
    fn query_is_parsed_into_params() {
        let s = State::new("/a/x?user=42&tab=info&q=hello%20world", None);
        assert_eq!(s.params.get("user").map(String::as_str), Some("42"));
        assert_eq!(s.params.get("tab").map(String::as_str), Some("info"));
        assert_eq!(s.params.get("q").map(String::as_str), Some("hello world"));
    }

    #[test]
    fn repeated_keys_keep_last_value() {
        let p = parse_query("a=1&a=2&b");
        assert_eq!(p.get("a").map(String::as_str), Some("2"));
        assert_eq!(p.get("b").map(String::as_str), Some(""));
    }

    #[test]
    fn id_generator_is_monotonic_and_unique() {
        let mut ids = IdGenerator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(IdGenerator::starting_at(0).next_id().get(), 1);
    }

    #[test]
    fn state_payload_tolerates_missing_optional_fields() {
        let s: State =
            serde_json::from_str(r#"{"path":"/a","view":"/a","panel":"/x","id":7}"#).unwrap();
        assert_eq!(s.id, Some(StateId::new(7)));
        assert!(s.meta.is_empty());
    }
}

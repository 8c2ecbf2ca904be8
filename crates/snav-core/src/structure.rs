#![forbid(unsafe_code)]

//! Navigation structure: the immutable root → view → panel tree.
//!
//! A [`RootStructure`] is created exactly once, either from an explicit
//! description (see [`RootStructure::from_json_str`] or the typed
//! constructors) or inferred from a declarative composition
//! (see [`crate::composition`]). It is never mutated afterwards.
//!
//! # Wire shape
//!
//! ```json
//! { "type": "root", "children": [
//!     { "type": "view", "nav": "/a", "children": [
//!         { "type": "panel", "nav": "/x" },
//!         { "type": "panel", "nav": "/y" } ] } ] }
//! ```
//!
//! # Invariants
//!
//! 1. There is exactly one root (`root` or `epic`).
//! 2. Root children are views; view children are panels.
//! 3. `nav` ids are unique among siblings and never the bare `/`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier naming a view or panel, always in leading-slash form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NavId(String);

impl NavId {
    /// Create a nav id, normalizing to leading-slash form (`"a"` → `"/a"`).
    #[must_use]
    pub fn new(nav: impl Into<String>) -> Self {
        let nav = nav.into();
        if nav.starts_with('/') {
            Self(nav)
        } else {
            Self(format!("/{nav}"))
        }
    }

    /// The placeholder id used before anything has been matched.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Whether this is the `/` placeholder.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NavId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NavId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for NavId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<NavId> for String {
    fn from(value: NavId) -> Self {
        value.0
    }
}

impl PartialEq<str> for NavId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NavId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors produced while building or decoding a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Two siblings share a nav id.
    DuplicateNav { parent: String, nav: NavId },
    /// A view or panel carries the bare `/` (or empty) nav id.
    EmptyNav { parent: String },
    /// A node appeared where a different kind was required.
    InvalidKind { expected: &'static str, found: &'static str },
    /// Malformed JSON description.
    Json(String),
    /// A structure has already been installed.
    AlreadyInitialized,
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNav { parent, nav } => {
                write!(f, "duplicate nav id {nav} under {parent}")
            }
            Self::EmptyNav { parent } => write!(f, "empty nav id under {parent}"),
            Self::InvalidKind { expected, found } => {
                write!(f, "expected {expected} node, found {found}")
            }
            Self::Json(msg) => write!(f, "structure JSON error: {msg}"),
            Self::AlreadyInitialized => f.write_str("structure is already initialized"),
        }
    }
}

impl std::error::Error for StructureError {}

/// Outer container label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    #[default]
    Root,
    Epic,
}

/// Untyped structure node as it appears on the wire.
///
/// [`RootStructure`] is the validated form; this enum is the tagged variant
/// used for decoding, encoding, and generic traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StructureNode {
    Root {
        children: Vec<StructureNode>,
    },
    Epic {
        children: Vec<StructureNode>,
    },
    View {
        nav: NavId,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        infinite: bool,
        children: Vec<StructureNode>,
    },
    Panel {
        nav: NavId,
    },
}

impl StructureNode {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Root { .. } => "root",
            Self::Epic { .. } => "epic",
            Self::View { .. } => "view",
            Self::Panel { .. } => "panel",
        }
    }
}

/// Leaf screen inside a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStructure {
    pub nav: NavId,
}

impl PanelStructure {
    #[must_use]
    pub fn new(nav: impl Into<NavId>) -> Self {
        Self { nav: nav.into() }
    }
}

/// Named screen-group holding an ordered list of panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewStructure {
    pub nav: NavId,
    /// Set for infinite views; resolves exactly like a plain view.
    pub infinite: bool,
    pub panels: Vec<PanelStructure>,
}

impl ViewStructure {
    #[must_use]
    pub fn new<I, P>(nav: impl Into<NavId>, panels: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<NavId>,
    {
        Self {
            nav: nav.into(),
            infinite: false,
            panels: panels.into_iter().map(PanelStructure::new).collect(),
        }
    }

    /// Mark the view as infinite.
    #[must_use]
    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    /// Find a direct panel child by nav id.
    #[must_use]
    pub fn panel(&self, nav: &NavId) -> Option<&PanelStructure> {
        self.panels.iter().find(|p| &p.nav == nav)
    }
}

/// Validated navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StructureNode", into = "StructureNode")]
pub struct RootStructure {
    kind: StructureKind,
    views: Vec<ViewStructure>,
}

impl RootStructure {
    /// Build and validate a structure.
    pub fn new(kind: StructureKind, views: Vec<ViewStructure>) -> Result<Self, StructureError> {
        let structure = Self { kind, views };
        structure.validate()?;
        Ok(structure)
    }

    /// Build a structure without sibling validation.
    ///
    /// Used by the composition parser, which already deduplicates.
    pub(crate) fn from_parts(kind: StructureKind, views: Vec<ViewStructure>) -> Self {
        Self { kind, views }
    }

    /// Decode the explicit JSON shape.
    pub fn from_json_str(json: &str) -> Result<Self, StructureError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| StructureError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode from an already-parsed JSON value.
    ///
    /// Anything but a `root`/`epic` object with a `children` array is
    /// rejected before decoding.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StructureError> {
        if !Self::looks_like_structure(&value) {
            return Err(StructureError::Json(
                "expected a root or epic node with children".into(),
            ));
        }
        serde_json::from_value(value).map_err(|e| StructureError::Json(e.to_string()))
    }

    /// Cheap shape guard: a JSON object whose `type` is `root`/`epic` and
    /// whose `children` is an array.
    #[must_use]
    pub fn looks_like_structure(value: &serde_json::Value) -> bool {
        let kind_ok = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|t| t == "root" || t == "epic");
        kind_ok && value.get("children").is_some_and(serde_json::Value::is_array)
    }

    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        self.kind
    }

    #[must_use]
    pub fn views(&self) -> &[ViewStructure] {
        &self.views
    }

    /// Find a view by nav id.
    #[must_use]
    pub fn view(&self, nav: &NavId) -> Option<&ViewStructure> {
        self.views.iter().find(|v| &v.nav == nav)
    }

    /// Total number of panels across all views.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.views.iter().map(|v| v.panels.len()).sum()
    }

    fn validate(&self) -> Result<(), StructureError> {
        let root_label = match self.kind {
            StructureKind::Root => "root",
            StructureKind::Epic => "epic",
        };
        check_siblings(root_label, self.views.iter().map(|v| &v.nav))?;
        for view in &self.views {
            check_siblings(view.nav.as_str(), view.panels.iter().map(|p| &p.nav))?;
        }
        Ok(())
    }
}

fn check_siblings<'a>(
    parent: &str,
    navs: impl Iterator<Item = &'a NavId>,
) -> Result<(), StructureError> {
    let mut seen = HashSet::new();
    for nav in navs {
        if nav.is_root() {
            return Err(StructureError::EmptyNav {
                parent: parent.to_owned(),
            });
        }
        if !seen.insert(nav) {
            return Err(StructureError::DuplicateNav {
                parent: parent.to_owned(),
                nav: nav.clone(),
            });
        }
    }
    Ok(())
}

impl TryFrom<StructureNode> for RootStructure {
    type Error = StructureError;

    fn try_from(node: StructureNode) -> Result<Self, Self::Error> {
        let (kind, children) = match node {
            StructureNode::Root { children } => (StructureKind::Root, children),
            StructureNode::Epic { children } => (StructureKind::Epic, children),
            other => {
                return Err(StructureError::InvalidKind {
                    expected: "root or epic",
                    found: other.kind_name(),
                });
            }
        };

        let mut views = Vec::with_capacity(children.len());
        for child in children {
            let StructureNode::View {
                nav,
                infinite,
                children,
            } = child
            else {
                return Err(StructureError::InvalidKind {
                    expected: "view",
                    found: child.kind_name(),
                });
            };
            let mut panels = Vec::with_capacity(children.len());
            for panel in children {
                match panel {
                    StructureNode::Panel { nav } => panels.push(PanelStructure { nav }),
                    other => {
                        return Err(StructureError::InvalidKind {
                            expected: "panel",
                            found: other.kind_name(),
                        });
                    }
                }
            }
            views.push(ViewStructure {
                nav,
                infinite,
                panels,
            });
        }

        Self::new(kind, views)
    }
}

impl From<RootStructure> for StructureNode {
    fn from(structure: RootStructure) -> Self {
        let children = structure
            .views
            .into_iter()
            .map(|view| StructureNode::View {
                nav: view.nav,
                infinite: view.infinite,
                children: view
                    .panels
                    .into_iter()
                    .map(|p| StructureNode::Panel { nav: p.nav })
                    .collect(),
            })
            .collect();
        match structure.kind {
            StructureKind::Root => StructureNode::Root { children },
            StructureKind::Epic => StructureNode::Epic { children },
        }
    }
}

#![forbid(unsafe_code)]

//! Structure inference from a declarative UI composition.
//!
//! A rendering layer can describe its screens as a tree of
//! [`CompositionNode`]s, each carrying an explicit [`Role`]. The parser walks
//! that tree depth-first and derives the [`RootStructure`]:
//!
//! - `Root` / `Epic` set the outer label (the last one seen wins).
//! - `View` / `ViewInfinite` yield one view holding the nav ids of its
//!   *direct* children that carry a nav id, in order.
//! - `Panel` nodes matter only as direct children of a view.
//! - `Element` nodes are layout noise and are descended into.
//! - `Foreign` nodes are navigation containers from another toolkit. They
//!   are reported as a warning and descended into.
//!
//! Views without a nav id and duplicate siblings are skipped and reported.
//! The parser never fails: problems come back as [`ParseWarning`]s next to a
//! usable structure.
//!
//! ```
//! use snav_core::composition::{parse_composition, CompositionNode as N};
//!
//! let app = N::root([
//!     N::view("/feed", [N::panel("/main"), N::panel("/post")]),
//!     N::view("/profile", [N::panel("/me")]),
//! ]);
//! let parsed = parse_composition(&app);
//! assert!(parsed.warnings.is_empty());
//! assert_eq!(parsed.structure.views().len(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::structure::{NavId, PanelStructure, RootStructure, StructureKind, ViewStructure};

/// Semantic role of a composition node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Root,
    Epic,
    View,
    ViewInfinite,
    Panel,
    /// Plain layout element with no navigation meaning.
    Element,
    /// Navigation container belonging to some other toolkit.
    Foreign(String),
}

/// One node of a declarative composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionNode {
    pub role: Role,
    pub nav: Option<String>,
    pub children: Vec<CompositionNode>,
}

impl CompositionNode {
    #[must_use]
    pub fn new(role: Role, nav: Option<String>, children: Vec<CompositionNode>) -> Self {
        Self {
            role,
            nav,
            children,
        }
    }

    #[must_use]
    pub fn root(children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(Role::Root, None, children.into_iter().collect())
    }

    #[must_use]
    pub fn epic(children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(Role::Epic, None, children.into_iter().collect())
    }

    #[must_use]
    pub fn view(nav: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(Role::View, Some(nav.into()), children.into_iter().collect())
    }

    #[must_use]
    pub fn view_infinite(nav: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(
            Role::ViewInfinite,
            Some(nav.into()),
            children.into_iter().collect(),
        )
    }

    #[must_use]
    pub fn panel(nav: impl Into<String>) -> Self {
        Self::new(Role::Panel, Some(nav.into()), Vec::new())
    }

    #[must_use]
    pub fn element(children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(Role::Element, None, children.into_iter().collect())
    }

    #[must_use]
    pub fn foreign(name: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self::new(
            Role::Foreign(name.into()),
            None,
            children.into_iter().collect(),
        )
    }

    /// Attach a nav id to any node.
    #[must_use]
    pub fn with_nav(mut self, nav: impl Into<String>) -> Self {
        self.nav = Some(nav.into());
        self
    }

    fn nav_id(&self) -> Option<NavId> {
        self.nav
            .as_deref()
            .map(NavId::new)
            .filter(|nav| !nav.is_root())
    }
}

/// Non-fatal problems found while inferring a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A container from another toolkit was mixed into the tree.
    ForeignContainer(String),
    /// A view without a nav id was skipped.
    UnlabeledView,
    /// A second view with the same nav id was skipped.
    DuplicateView(NavId),
    /// A second panel with the same nav id inside one view was skipped.
    DuplicatePanel { view: NavId, panel: NavId },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignContainer(name) => write!(
                f,
                "foreign navigation container {name} found in the structure; \
                 navigation may misbehave, use this crate's root/epic/view roles"
            ),
            Self::UnlabeledView => f.write_str("view without a nav id skipped"),
            Self::DuplicateView(nav) => write!(f, "duplicate view {nav} skipped"),
            Self::DuplicatePanel { view, panel } => {
                write!(f, "duplicate panel {panel} in view {view} skipped")
            }
        }
    }
}

/// Result of [`parse_composition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub structure: RootStructure,
    pub warnings: Vec<ParseWarning>,
}

/// Derive a [`RootStructure`] from a composition. Pure and deterministic.
#[must_use]
pub fn parse_composition(root: &CompositionNode) -> ParseOutcome {
    let mut parser = Parser::default();
    parser.visit(root);
    ParseOutcome {
        structure: RootStructure::from_parts(parser.kind, parser.views),
        warnings: parser.warnings,
    }
}

#[derive(Default)]
struct Parser {
    kind: StructureKind,
    views: Vec<ViewStructure>,
    seen_views: HashSet<NavId>,
    warnings: Vec<ParseWarning>,
}

impl Parser {
    fn visit(&mut self, node: &CompositionNode) {
        match &node.role {
            Role::Root => self.kind = StructureKind::Root,
            Role::Epic => self.kind = StructureKind::Epic,
            Role::View | Role::ViewInfinite => self.add_view(node),
            Role::Foreign(name) => self
                .warnings
                .push(ParseWarning::ForeignContainer(name.clone())),
            Role::Panel | Role::Element => {}
        }
        for child in &node.children {
            self.visit(child);
        }
    }

    fn add_view(&mut self, node: &CompositionNode) {
        let Some(nav) = node.nav_id() else {
            self.warnings.push(ParseWarning::UnlabeledView);
            return;
        };
        if !self.seen_views.insert(nav.clone()) {
            self.warnings.push(ParseWarning::DuplicateView(nav));
            return;
        }

        let mut seen_panels = HashSet::new();
        let mut panels = Vec::new();
        for panel in node.children.iter().filter_map(CompositionNode::nav_id) {
            if seen_panels.insert(panel.clone()) {
                panels.push(PanelStructure { nav: panel });
            } else {
                self.warnings.push(ParseWarning::DuplicatePanel {
                    view: nav.clone(),
                    panel,
                });
            }
        }

        self.views.push(ViewStructure {
            nav,
            infinite: node.role == Role::ViewInfinite,
            panels,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::CompositionNode as N;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn infers_root_views_and_panels() {
        let app = N::root([
            N::view("/a", [N::panel("/x"), N::panel("/y")]),
            N::view("/b", [N::panel("/z")]),
        ]);
        let out = parse_composition(&app);
        let expected = RootStructure::new(
            StructureKind::Root,
            vec![
                ViewStructure::new("/a", ["/x", "/y"]),
                ViewStructure::new("/b", ["/z"]),
            ],
        )
        .unwrap();
        assert_eq!(out.structure, expected);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn epic_label_and_nested_layout_elements() {
        let app = N::element([N::epic([N::element([
            N::view("/feed", [N::panel("/main")]),
            N::element([N::view_infinite("/chat", [N::panel("/list")])]),
        ])])]);
        let out = parse_composition(&app);
        assert_eq!(out.structure.kind(), StructureKind::Epic);
        assert_eq!(out.structure.views().len(), 2);
        assert!(!out.structure.views()[0].infinite);
        assert!(out.structure.views()[1].infinite);
    }

    #[test]
    fn only_direct_labeled_children_become_panels() {
        let app = N::root([N::view(
            "/a",
            [
                N::panel("/x"),
                N::element([]),
                N::element([N::panel("/deep")]),
                N::element([]).with_nav("/labeled"),
            ],
        )]);
        let out = parse_composition(&app);
        let panels: Vec<_> = out.structure.views()[0]
            .panels
            .iter()
            .map(|p| p.nav.as_str().to_owned())
            .collect();
        assert_eq!(panels, vec!["/x", "/labeled"]);
    }

    #[test]
    fn foreign_containers_are_reported_but_walked() {
        let app = N::root([N::foreign("vkui::View", [N::view("/a", [N::panel("/x")])])]);
        let out = parse_composition(&app);
        assert_eq!(
            out.warnings,
            vec![ParseWarning::ForeignContainer("vkui::View".into())]
        );
        assert_eq!(out.structure.views().len(), 1);
    }

    #[test]
    fn unlabeled_and_duplicate_nodes_are_skipped() {
        let app = N::root([
            N::new(Role::View, None, vec![N::panel("/x")]),
            N::view("/a", [N::panel("/x"), N::panel("x")]),
            N::view("a", [N::panel("/y")]),
        ]);
        let out = parse_composition(&app);
        assert_eq!(out.structure.views().len(), 1);
        assert_eq!(out.structure.views()[0].panels.len(), 1);
        assert_eq!(
            out.warnings,
            vec![
                ParseWarning::UnlabeledView,
                ParseWarning::DuplicatePanel {
                    view: NavId::new("/a"),
                    panel: NavId::new("/x"),
                },
                ParseWarning::DuplicateView(NavId::new("/a")),
            ]
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let app = N::root([N::view("/a", [N::panel("/x")])]);
        assert_eq!(parse_composition(&app), parse_composition(&app));
    }

    #[test]
    fn empty_composition_gives_empty_root() {
        let out = parse_composition(&N::element([]));
        assert_eq!(out.structure.kind(), StructureKind::Root);
        assert!(out.structure.views().is_empty());
    }
}

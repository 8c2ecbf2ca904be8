#![forbid(unsafe_code)]

//! Core: navigation structure, path resolution, state, and options.
//!
//! # Role in stacknav
//! `snav-core` is the pure layer. It owns the immutable root → view → panel
//! tree, turns path strings into [`State`] values by walking that tree, and
//! holds the options resolved at initialization. Nothing here touches native
//! history or notifies anyone; that is `snav-runtime`'s job.
//!
//! # Primary responsibilities
//! - **Structure**: [`RootStructure`], explicit or inferred from a
//!   [`composition::CompositionNode`] tree.
//! - **Resolution**: [`resolve`] / [`RootStructure::resolve`].
//! - **State**: [`State`], [`StateId`], [`Meta`], [`Params`].
//! - **Options**: [`Options`], [`Mode`], [`Style`].

pub mod composition;
pub mod options;
pub mod resolver;
pub mod state;
pub mod structure;

pub use composition::{CompositionNode, ParseOutcome, ParseWarning, Role, parse_composition};
pub use options::{ConfigError, Mode, Options, Style};
pub use resolver::{ResolveError, resolve, segments};
pub use state::{IdGenerator, Meta, Params, State, StateId, parse_query};
pub use structure::{
    NavId, PanelStructure, RootStructure, StructureError, StructureKind, StructureNode,
    ViewStructure,
};

/// Where a navigator gets its structure from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    /// A structure declared up front. The primary path.
    Explicit(RootStructure),
    /// A declarative composition the structure is inferred from.
    Composition(CompositionNode),
}

impl From<RootStructure> for StructureSource {
    fn from(structure: RootStructure) -> Self {
        Self::Explicit(structure)
    }
}

impl From<CompositionNode> for StructureSource {
    fn from(node: CompositionNode) -> Self {
        Self::Composition(node)
    }
}

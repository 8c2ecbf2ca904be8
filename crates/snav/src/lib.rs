#![forbid(unsafe_code)]

//! stacknav public facade crate.
//!
//! Re-exports the stable surface of the internal crates and offers a
//! [`Builder`] plus a prelude for day-to-day use.
//!
//! ```
//! use snav::prelude::*;
//!
//! let structure = RootStructure::new(
//!     StructureKind::Root,
//!     vec![ViewStructure::new("/feed", ["/main", "/post"])],
//! )
//! .unwrap();
//!
//! let mut nav = Builder::new()
//!     .options(Options::default().with_default_route("/feed/main"))
//!     .structure(structure)
//!     .build(MemoryHistory::default(), NullBridge);
//! nav.start();
//! nav.push("/feed/post?id=7", None);
//! assert_eq!(nav.state().panel, "/post");
//! assert_eq!(nav.params().get("id").map(String::as_str), Some("7"));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use snav_core::{
    CompositionNode, ConfigError, Meta, Mode, NavId, Options, Params, ParseWarning,
    ResolveError, Role, RootStructure, State, StateId, StructureError, StructureKind,
    StructureSource, Style, ViewStructure, parse_composition, resolve,
};

// --- Backend re-exports ----------------------------------------------------

pub use snav_backend::{HistoryBackend, HostBridge, NullBridge, PopState, PopStateSource};

// --- Runtime re-exports ----------------------------------------------------

pub use snav_runtime::{
    Direction, EventBus, HistoryStore, LockMode, NavError, Navigator, Reconciled, RouterEvent,
    Unsubscribe,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use snav_web::{MemoryHistory, RecordingBridge, decode_popstate, popstate_from_json};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for stacknav setup.
#[derive(Debug)]
pub enum Error {
    /// Options could not be loaded.
    Config(ConfigError),
    /// The structure could not be built or installed.
    Structure(StructureError),
    /// A navigation call failed.
    Navigation(NavError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Structure(err) => write!(f, "{err}"),
            Self::Navigation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Structure(err) => Some(err),
            Self::Navigation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StructureError> for Error {
    fn from(err: StructureError) -> Self {
        Self::Structure(err)
    }
}

impl From<NavError> for Error {
    fn from(err: NavError) -> Self {
        Self::Navigation(err)
    }
}

/// Standard result type for stacknav setup APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Builder ---------------------------------------------------------------

/// Assemble a [`Navigator`] from options and an optional structure.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Builder {
    options: Options,
    structure: Option<StructureSource>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from options stored as TOML.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(Self::new().options(Options::from_toml_str(s)?))
    }

    /// Start from options stored in a TOML file.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new().options(Options::from_toml_file(path)?))
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Explicit structure or a composition to infer one from.
    pub fn structure(mut self, source: impl Into<StructureSource>) -> Self {
        self.structure = Some(source.into());
        self
    }

    /// Structure given as JSON (`{ "type": "root", "children": [...] }`).
    pub fn structure_json(self, json: &str) -> Result<Self> {
        Ok(self.structure(RootStructure::from_json_str(json)?))
    }

    /// Build the navigator. An inferred structure leaves a pending settle
    /// step for the host to run once its own setup is done.
    pub fn build<H: HistoryBackend, B: HostBridge>(self, backend: H, bridge: B) -> Navigator<H, B> {
        match self.structure {
            Some(StructureSource::Explicit(structure)) => {
                Navigator::with_structure(self.options, structure, backend, bridge)
            }
            Some(source @ StructureSource::Composition(_)) => {
                let mut nav = Navigator::new(self.options, backend, bridge);
                nav.init_structure(source);
                nav
            }
            None => Navigator::new(self.options, backend, bridge),
        }
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Builder, CompositionNode, Error, HistoryBackend, HostBridge, LockMode, Meta, Mode,
        Navigator, NullBridge, Options, PopState, Result, RootStructure, RouterEvent, State,
        StructureKind, Style, ViewStructure,
    };

    #[cfg(feature = "web")]
    pub use crate::{MemoryHistory, RecordingBridge};

    pub use crate::{backend, core, runtime};
}

pub use snav_backend as backend;
pub use snav_core as core;
pub use snav_runtime as runtime;
#[cfg(feature = "web")]
pub use snav_web as web;

#![forbid(unsafe_code)]

//! Navigator options, resolved once at initialization.
//!
//! # Loading
//!
//! With the `config` feature (on by default) options can be read from TOML
//! or JSON. Every field is optional in the file; missing fields take the
//! defaults below.
//!
//! ```toml
//! mode = "path"
//! default_route = "/feed/main"
//! should_close = false
//! ```
//!
//! | Field           | Default  |
//! |-----------------|----------|
//! | `mode`          | `hash`   |
//! | `style`         | `auto`   |
//! | `default_route` | `"/"`    |
//! | `should_close`  | `true`   |
//! | `debug`         | `false`  |

use std::fmt;
#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How the current path is reflected in the address surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Not reflected at all.
    None,
    /// Reflected as a literal path component.
    Path,
    /// Reflected after a `#`.
    #[default]
    Hash,
}

impl Mode {
    /// URL handed to the native history API for `path`.
    #[must_use]
    pub fn history_url(self, path: &str) -> String {
        match self {
            Self::None => String::new(),
            Self::Path => path.to_owned(),
            Self::Hash => format!("#{path}"),
        }
    }
}

/// Presentation style requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Ask the host bridge.
    #[default]
    Auto,
    Mobile,
    Desktop,
}

/// Navigator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub mode: Mode,
    pub style: Style,
    /// Route applied at start and after structure initialization.
    pub default_route: String,
    /// Ask the host to close when back is requested on the last entry.
    pub should_close: bool,
    /// Emit development diagnostics and per-transition debug records even in
    /// release builds.
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Hash,
            style: Style::Auto,
            default_route: "/".to_owned(),
            should_close: true,
            debug: false,
        }
    }
}

impl Options {
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_default_route(mut self, route: impl Into<String>) -> Self {
        self.default_route = route.into();
        self
    }

    #[must_use]
    pub fn with_should_close(mut self, should_close: bool) -> Self {
        self.should_close = should_close;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Whether development diagnostics should be emitted.
    #[must_use]
    pub fn diagnostics(&self) -> bool {
        cfg!(debug_assertions) || self.debug
    }

    /// Validate all fields. An empty list means the options are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.default_route.starts_with('/') {
            errors.push(format!(
                "default_route must start with '/', got {:?}",
                self.default_route
            ));
        }
        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(|e| ConfigError::Toml(e.to_string()))?
            .validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(|e| ConfigError::Json(e.to_string()))?
            .validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Errors from loading options.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(String),
    Json(String),
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(msg) => write!(f, "TOML parse error: {msg}"),
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::Invalid(errors) => write!(f, "invalid options: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

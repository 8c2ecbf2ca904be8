#![forbid(unsafe_code)]

//! `snav-web` provides host-driven backend pieces for stacknav.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS, a webview shell, or
//!   a test) delivers popstate notifications; nothing here blocks.
//! - **Deterministic**: [`MemoryHistory`] reproduces browser history
//!   semantics without a browser, so scenarios replay identically.
//!
//! This crate does not bind to `wasm-bindgen`. A JS glue layer forwards
//! `popstate` events as JSON through [`payload::popstate_from_json`].

pub mod bridge;
pub mod memory;
pub mod payload;

pub use bridge::RecordingBridge;
pub use memory::{Entry, MemoryHistory, MemoryHistoryError};
pub use payload::{decode_popstate, encode_state, popstate_from_json};
pub use snav_backend::NullBridge;

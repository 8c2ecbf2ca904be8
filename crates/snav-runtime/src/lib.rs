#![forbid(unsafe_code)]

//! Runtime: the navigator engine.
//!
//! # Role in stacknav
//! `snav-runtime` owns everything that changes over a session: the
//! [`HistoryStore`] mirror of native history, the [`LockGate`], the
//! [`EventBus`], and the [`Navigator`] that sequences them against a
//! [`snav_backend::HistoryBackend`].
//!
//! # Threading
//! Single-threaded by construction. Listeners are `Rc`-shared closures and
//! the navigator is driven from one host loop.

pub mod error;
pub mod events;
pub mod history;
pub mod lock;
pub mod navigator;

pub use error::NavError;
pub use events::{EventBus, RouterEvent, Unsubscribe};
pub use history::HistoryStore;
pub use lock::{LockGate, LockMode};
pub use navigator::{Direction, Navigator, Reconciled};

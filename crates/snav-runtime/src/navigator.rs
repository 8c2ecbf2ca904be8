#![forbid(unsafe_code)]

//! The navigator: one engine instance that arbitrates between programmatic
//! navigation calls and native history notifications.
//!
//! # Lifecycle
//!
//! ```text
//! new ──init_structure──▶ structured ──settle──▶ default route applied
//!  │                          │
//!  └────────start────────────▶ listening ◀──stop/start──▶ stopped
//! ```
//!
//! - [`Navigator::init_structure`] installs the structure once, resets the
//!   history to the default route, and raises a pending *settle* step.
//! - [`Navigator::settle`] runs that step: it replaces the current entry with
//!   the default route once the host's own setup has finished.
//! - [`Navigator::start`] begins accepting popstate notifications and, with a
//!   structure, applies the default route immediately.
//!
//! # Ordering
//!
//! A programmatic call mutates native history first, then the
//! [`HistoryStore`], then notifies listeners. Nothing else can interleave
//! because the whole sequence runs synchronously on the caller's turn.
//!
//! # Popstate reconciliation
//!
//! 1. A pending *skip* marker is consumed and the notification dropped.
//! 2. A missing or foreign payload emits [`RouterEvent::Update`] with no state.
//! 3. If the restored id is in the store the move is **back**, otherwise it
//!    is **forward** (push-equivalent).
//! 4. If the lock forbids the move, the skip marker is armed and the opposite
//!    native move is issued to undo it. Nothing is emitted.
//! 5. Otherwise the move is applied and `Back` or `Push` emitted.
//!
//! # Invariants
//!
//! - The internal marker is only raised for a native move that will happen:
//!   `forward`/`go(+n)` is refused when fewer than `n` entries are known to
//!   lie ahead, so a user move can never inherit a stale marker.
//! - Stopping drops both markers; a notification that arrives while stopped
//!   consumes nothing later.
//!
//! # Failure Modes
//!
//! - **Re-entrant navigation**: listeners receive `&State`, not the
//!   navigator. Navigating from inside a listener requires the host to queue
//!   the call for after the emission returns.

use std::collections::HashMap;

use snav_backend::{HistoryBackend, HostBridge, PopState, PopStateSource};
use snav_core::{
    IdGenerator, Meta, NavId, Options, Params, RootStructure, State, StateId, StructureError,
    StructureSource, Style, parse_composition, resolve,
};
use tracing::{debug, debug_span, error, trace, warn};

use crate::error::NavError;
use crate::events::{EventBus, RouterEvent, Unsubscribe};
use crate::history::HistoryStore;
use crate::lock::{LockGate, LockMode};

/// Direction of a reconciled native move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

/// What the reconciler did with one popstate notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Dropped because the navigator is stopped.
    Ignored,
    /// Back onto the entry that is already on top; nothing to apply.
    AlreadyCurrent,
    /// Consumed by the skip marker.
    Skipped,
    /// Payload missing or foreign; `Update` emitted.
    External,
    /// Blocked by the lock; the opposite move was issued.
    Cancelled(Direction),
    /// Applied and emitted.
    Applied(Direction),
    /// Back onto the last remaining entry; the host was asked to close.
    Closed,
}

/// Navigation engine owning structure, history, lock state, and listeners.
pub struct Navigator<H, B> {
    options: Options,
    structure: Option<RootStructure>,
    history: HistoryStore,
    visited: HashMap<StateId, Meta>,
    ids: IdGenerator,
    gate: LockGate,
    bus: EventBus,
    backend: H,
    bridge: B,
    started: bool,
    pending_settle: bool,
    is_back: bool,
    /// Native entries known to lie ahead of the current one.
    forward_depth: usize,
    /// Steps of the navigator's own forward move awaiting its popstate.
    pending_forward: usize,
}

impl<H, B> std::fmt::Debug for Navigator<H, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("options", &self.options)
            .field("structured", &self.structure.is_some())
            .field("history", &self.history)
            .field("lock", &self.gate.mode())
            .field("started", &self.started)
            .field("pending_settle", &self.pending_settle)
            .field("forward_depth", &self.forward_depth)
            .finish()
    }
}

impl<H: HistoryBackend, B: HostBridge> Navigator<H, B> {
    /// Create a navigator without a structure.
    ///
    /// Until [`Self::init_structure`] runs, the current state points at the
    /// default screen and every `push`/`replace` is dropped as unresolved.
    pub fn new(options: Options, backend: H, bridge: B) -> Self {
        if options.diagnostics() {
            for problem in options.validate() {
                warn!(problem = %problem, "invalid navigator option");
            }
        }
        let mut ids = IdGenerator::default();
        let initial = State::new(options.default_route.clone(), None).with_id(ids.next_id());
        let mut nav = Self {
            options,
            structure: None,
            history: HistoryStore::new(initial.clone()),
            visited: HashMap::new(),
            ids,
            gate: LockGate::new(),
            bus: EventBus::new(),
            backend,
            bridge,
            started: false,
            pending_settle: false,
            is_back: false,
            forward_depth: 0,
            pending_forward: 0,
        };
        nav.remember(&initial);
        nav
    }

    /// Create a navigator with an explicit structure already installed.
    ///
    /// No settle step is raised: [`Self::start`] applies the default route.
    pub fn with_structure(options: Options, structure: RootStructure, backend: H, bridge: B) -> Self {
        let mut nav = Self::new(options, backend, bridge);
        nav.install(structure);
        nav.pending_settle = false;
        nav
    }

    // ========================================================================
    // Structure and lifecycle
    // ========================================================================

    /// Install the structure. A second call is a no-op reported as a
    /// development diagnostic.
    pub fn init_structure(&mut self, source: impl Into<StructureSource>) {
        if let Err(e) = self.try_init_structure(source) {
            self.report("init_structure", &e);
        }
    }

    pub fn try_init_structure(&mut self, source: impl Into<StructureSource>) -> Result<(), NavError> {
        let source = source.into();
        if self.structure.is_some() {
            if self.options.diagnostics() {
                match source {
                    StructureSource::Explicit(_) => {
                        error!("cannot change the navigation structure: it is already defined");
                    }
                    StructureSource::Composition(_) => {
                        warn!("skipping structure inference: a structure is already defined");
                    }
                }
            }
            return Err(StructureError::AlreadyInitialized.into());
        }

        let structure = match source {
            StructureSource::Explicit(structure) => structure,
            StructureSource::Composition(node) => {
                let outcome = parse_composition(&node);
                if self.options.diagnostics() {
                    for warning in &outcome.warnings {
                        warn!(%warning, "structure inference");
                    }
                }
                outcome.structure
            }
        };
        self.install(structure);
        Ok(())
    }

    fn install(&mut self, structure: RootStructure) {
        let initial = structure
            .resolve(&self.options.default_route, None)
            .with_id(self.ids.next_id());
        debug!(
            views = structure.views().len(),
            panels = structure.panel_count(),
            "navigation structure installed"
        );
        self.structure = Some(structure);
        self.history.reset(initial.clone());
        self.forward_depth = 0;
        self.remember(&initial);
        self.pending_settle = true;
    }

    /// Whether a settle step is waiting to run.
    #[must_use]
    pub const fn needs_settle(&self) -> bool {
        self.pending_settle
    }

    /// Apply the default route deferred by [`Self::init_structure`].
    ///
    /// Runs at most once per structure initialization; returns whether it ran.
    pub fn settle(&mut self) -> bool {
        if !std::mem::take(&mut self.pending_settle) {
            return false;
        }
        let route = self.options.default_route.clone();
        self.replace(&route, None);
        true
    }

    /// Begin accepting popstate notifications.
    pub fn start(&mut self) {
        if self.started {
            if self.options.diagnostics() {
                warn!("navigator already started");
            }
            return;
        }
        self.started = true;
        if self.structure.is_some() {
            self.pending_settle = false;
            let route = self.options.default_route.clone();
            self.replace(&route, None);
        }
    }

    /// Stop accepting popstate notifications.
    pub fn stop(&mut self) {
        if !self.started {
            if self.options.diagnostics() {
                warn!("navigator is not started");
            }
            return;
        }
        self.started = false;
        self.clear_markers();
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    // ========================================================================
    // Locking
    // ========================================================================

    pub fn lock(&mut self, mode: LockMode) {
        trace!(%mode, "lock");
        self.gate.lock(mode);
    }

    pub fn unlock(&mut self) {
        trace!("unlock");
        self.gate.unlock();
    }

    #[must_use]
    pub const fn lock_mode(&self) -> LockMode {
        self.gate.mode()
    }

    // ========================================================================
    // Programmatic navigation
    // ========================================================================

    /// Push a new entry for `path`. Dropped silently when locked or
    /// unresolvable.
    pub fn push(&mut self, path: &str, meta: Option<Meta>) {
        if let Err(e) = self.try_push(path, meta) {
            self.report("push", &e);
        }
    }

    pub fn try_push(&mut self, path: &str, meta: Option<Meta>) -> Result<StateId, NavError> {
        self.ensure_unlocked()?;
        let id = self.ids.next_id();
        let state = resolve(self.structure.as_ref(), path, meta)?.with_id(id);

        let url = self.options.mode.history_url(path);
        self.backend
            .push_state(&state, &url)
            .map_err(|e| NavError::Backend(e.to_string()))?;
        self.clear_markers_internal();
        self.forward_depth = 0;

        self.remember(&state);
        self.history.push(state);
        self.is_back = false;
        self.emit(RouterEvent::Push);
        Ok(id)
    }

    /// Replace the current entry with `path`, keeping its id.
    pub fn replace(&mut self, path: &str, meta: Option<Meta>) {
        if let Err(e) = self.try_replace(path, meta) {
            self.report("replace", &e);
        }
    }

    pub fn try_replace(&mut self, path: &str, meta: Option<Meta>) -> Result<StateId, NavError> {
        self.ensure_unlocked()?;
        let state = resolve(self.structure.as_ref(), path, meta)?;
        let id = match self.history.current().id {
            Some(id) => id,
            None => self.ids.next_id(),
        };
        let state = state.with_id(id);

        let url = self.options.mode.history_url(path);
        self.backend
            .replace_state(&state, &url)
            .map_err(|e| NavError::Backend(e.to_string()))?;
        self.clear_markers_internal();

        self.remember(&state);
        self.history.replace_top(state);
        self.emit(RouterEvent::Replace);
        Ok(id)
    }

    /// Go one entry back. On the last remaining entry the host is asked to
    /// close instead.
    pub fn back(&mut self) {
        if let Err(e) = self.try_go(-1) {
            self.report("back", &e);
        }
    }

    /// Go one entry forward.
    pub fn forward(&mut self) {
        if let Err(e) = self.try_go(1) {
            self.report("forward", &e);
        }
    }

    /// Move `delta` entries through native history.
    pub fn go(&mut self, delta: i32) {
        if let Err(e) = self.try_go(delta) {
            self.report("go", &e);
        }
    }

    pub fn try_go(&mut self, delta: i32) -> Result<(), NavError> {
        self.ensure_unlocked()?;
        if delta == 0 {
            return Ok(());
        }
        if delta < 0 && delta.unsigned_abs() as usize >= self.history.len() {
            self.close_app();
            return Err(NavError::EmptyHistory);
        }
        let ahead = if delta > 0 { delta.unsigned_abs() as usize } else { 0 };
        if ahead > self.forward_depth {
            return Err(NavError::NoForwardEntry);
        }

        self.gate.mark_internal();
        self.pending_forward = ahead;
        if let Err(e) = self.backend.go(delta) {
            self.clear_markers_internal();
            return Err(NavError::Backend(e.to_string()));
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), NavError> {
        if self.gate.allows_programmatic() {
            Ok(())
        } else {
            Err(NavError::LockRejected(self.gate.mode()))
        }
    }

    // ========================================================================
    // Popstate reconciliation
    // ========================================================================

    /// Reconcile one native "history position changed" notification.
    pub fn handle_popstate(&mut self, pop: PopState) -> Reconciled {
        let _span = debug_span!("snav.popstate", depth = self.history.len()).entered();

        if !self.started {
            trace!("popstate ignored: navigator stopped");
            self.clear_markers();
            return Reconciled::Ignored;
        }
        if self.gate.take_skip() {
            trace!("popstate consumed by counter-navigation");
            return Reconciled::Skipped;
        }

        let internal = self.gate.take_internal();
        let own_forward = std::mem::take(&mut self.pending_forward);
        let Some((id, restored)) = pop.state().and_then(|s| s.id.map(|id| (id, s))) else {
            // Entries without a payload may have truncated what lay ahead.
            self.forward_depth = 0;
            self.bus.emit(RouterEvent::Update, None);
            return Reconciled::External;
        };

        let direction = if self.history.contains(id) {
            Direction::Back
        } else {
            Direction::Forward
        };

        if !self.gate.allows_native(internal) {
            if self.history.current().id == Some(id) {
                // Landing on the current top changes nothing to undo.
                trace!(lock = %self.gate.mode(), "blocked move onto current entry");
                return Reconciled::AlreadyCurrent;
            }
            let undo = match direction {
                Direction::Back => 1,
                Direction::Forward => -1,
            };
            self.gate.arm_skip();
            if let Err(e) = self.backend.go(undo) {
                self.gate.take_skip();
                warn!(error = %e, "failed to cancel blocked navigation");
            }
            trace!(?direction, lock = %self.gate.mode(), "native navigation cancelled");
            return Reconciled::Cancelled(direction);
        }

        match direction {
            Direction::Back => match self.history.pop_to(id) {
                Some(0) | None => {
                    if self.history.len() == 1 {
                        self.close_app();
                        Reconciled::Closed
                    } else {
                        Reconciled::AlreadyCurrent
                    }
                }
                Some(popped) => {
                    self.forward_depth += popped;
                    self.is_back = true;
                    self.emit(RouterEvent::Back);
                    Reconciled::Applied(Direction::Back)
                }
            },
            Direction::Forward => {
                let steps = if internal { own_forward.max(1) } else { 1 };
                self.forward_depth = self.forward_depth.saturating_sub(steps);
                self.remember(&restored);
                self.history.push(restored);
                self.is_back = false;
                self.emit(RouterEvent::Push);
                Reconciled::Applied(Direction::Forward)
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &State {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Panel ids of the current view, for swipe-back gestures.
    #[must_use]
    pub fn swipeback(&self) -> &[NavId] {
        self.history.swipeback()
    }

    #[must_use]
    pub fn structure(&self) -> Option<&RootStructure> {
        self.structure.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Query parameters of the current state.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.history.current().params
    }

    /// Metadata of any state visited this session, falling back to the
    /// current state's metadata.
    #[must_use]
    pub fn meta_of(&self, id: Option<StateId>) -> &Meta {
        id.and_then(|id| self.visited.get(&id))
            .unwrap_or(&self.history.current().meta)
    }

    /// Whether the last applied transition went back.
    #[must_use]
    pub const fn is_back(&self) -> bool {
        self.is_back
    }

    /// Presentation style: the configured one, or for [`Style::Auto`] the
    /// embedding host's platform style (mobile when it names none). Pages
    /// outside a host are desktop.
    #[must_use]
    pub fn style(&self) -> Style {
        match self.options.style {
            Style::Auto if self.bridge.is_embedded() => {
                self.bridge.preferred_style().unwrap_or(Style::Mobile)
            }
            Style::Auto => Style::Desktop,
            fixed => fixed,
        }
    }

    /// Whether a close request would reach the host.
    #[must_use]
    pub fn should_close(&self) -> bool {
        self.options.should_close && self.bridge.supports_close()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(RouterEvent, Option<&State>) + 'static,
    ) -> Unsubscribe {
        self.bus.subscribe(listener)
    }

    #[must_use]
    pub fn backend(&self) -> &H {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut H {
        &mut self.backend
    }

    #[must_use]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Drop the internal marker and any forward move it was tracking.
    fn clear_markers_internal(&mut self) {
        self.gate.take_internal();
        self.pending_forward = 0;
    }

    fn clear_markers(&mut self) {
        self.clear_markers_internal();
        self.gate.take_skip();
    }

    fn close_app(&mut self) {
        if self.should_close() {
            debug!("requesting host close");
            self.bridge.close();
        } else if self.options.diagnostics() {
            warn!("no history left and the host cannot be closed");
        }
    }

    fn remember(&mut self, state: &State) {
        if let Some(id) = state.id {
            self.visited.insert(id, state.meta.clone());
        }
    }

    fn emit(&self, event: RouterEvent) {
        let state = self.history.current();
        if self.options.debug {
            debug!(
                %event,
                path = %state.path,
                view = %state.view,
                panel = %state.panel,
                id = ?state.id,
                depth = self.history.len(),
                "navigation"
            );
        }
        self.bus.emit(event, Some(state));
    }

    fn report(&self, op: &'static str, err: &NavError) {
        match err {
            NavError::LockRejected(_) => trace!(op, %err, "navigation dropped"),
            NavError::EmptyHistory | NavError::NoForwardEntry => {
                debug!(op, %err, "navigation dropped");
            }
            NavError::Backend(_) => warn!(op, %err, "navigation failed"),
            NavError::NotResolved(_) | NavError::Structure(_) => {
                if self.options.diagnostics() {
                    warn!(op, %err, "navigation dropped");
                }
            }
        }
    }
}

impl<H: HistoryBackend + PopStateSource, B: HostBridge> Navigator<H, B> {
    /// Drain and reconcile every pending popstate notification, including
    /// the ones produced by counter-navigations issued along the way.
    pub fn pump(&mut self) -> Vec<Reconciled> {
        let mut outcomes = Vec::new();
        while let Some(pop) = self.backend.poll_popstate() {
            outcomes.push(self.handle_popstate(pop));
        }
        outcomes
    }
}

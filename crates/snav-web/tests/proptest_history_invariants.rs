#![forbid(unsafe_code)]

//! Property-based invariants for the navigator over simulated history.
//!
//! Random interleavings of programmatic calls, user chrome actions, address
//! bar edits, and lock changes are replayed against a [`Navigator`] backed by
//! [`MemoryHistory`]. After every step:
//!
//! 1. **Stack never empty**: the history store holds at least one entry and
//!    its swipeback stack ends with the current panel.
//! 2. **At most one emission** per step, carrying the current state.
//! 3. **View-change rule**: a transition into another view resets swipeback
//!    to `[panel]`; within a view push grows it by one, replace keeps its
//!    length, and back shrinks it by one (never below one).
//! 4. **Lock all freezes**: programmatic calls change neither the store nor
//!    native history and emit nothing; user actions leave the store intact.
//! 5. **Close signal**: `back()` on a single-entry store asks the host to
//!    close exactly once and moves nothing.
//! 6. **Popstate-only lock**: user back/forward presses are never applied,
//!    a cancelled press puts native history back where it was, and
//!    programmatic pushes still go through.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use snav_core::{NavId, Options, RootStructure, State, StructureKind, ViewStructure};
use snav_runtime::{LockMode, Navigator, Reconciled, RouterEvent};
use snav_web::{MemoryHistory, RecordingBridge};

type Nav = Navigator<MemoryHistory, RecordingBridge>;
type Emissions = Rc<RefCell<Vec<(RouterEvent, Option<State>)>>>;

const PATHS: &[&str] = &[
    "/",
    "/a",
    "/a/x",
    "/a/y",
    "/a/y?tab=1",
    "/a/nope",
    "/b",
    "/b/z",
    "/zz/x",
];

#[derive(Debug, Clone)]
enum Op {
    Push(usize),
    Replace(usize),
    Back,
    Forward,
    PressBack,
    PressForward,
    EditUrl,
    Lock(LockMode),
    Unlock,
}

impl Op {
    fn is_programmatic(&self) -> bool {
        matches!(self, Self::Push(_) | Self::Replace(_) | Self::Back | Self::Forward)
    }

    fn is_user_chrome(&self) -> bool {
        matches!(self, Self::PressBack | Self::PressForward)
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..PATHS.len()).prop_map(Op::Push),
        2 => (0..PATHS.len()).prop_map(Op::Replace),
        3 => Just(Op::Back),
        1 => Just(Op::Forward),
        2 => Just(Op::PressBack),
        1 => Just(Op::PressForward),
        1 => Just(Op::EditUrl),
        1 => prop_oneof![Just(LockMode::PopstateOnly), Just(LockMode::All)].prop_map(Op::Lock),
        1 => Just(Op::Unlock),
    ]
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn structure() -> RootStructure {
    RootStructure::new(
        StructureKind::Root,
        vec![
            ViewStructure::new("/a", ["/x", "/y"]),
            ViewStructure::new("/b", ["/z"]),
        ],
    )
    .unwrap()
}

fn navigator(route: &str) -> (Nav, Emissions) {
    let mut nav = Navigator::with_structure(
        Options::default().with_default_route(route),
        structure(),
        MemoryHistory::new("/"),
        RecordingBridge::embedded(),
    );
    nav.start();
    let emissions: Emissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emissions);
    let _ = nav.subscribe(move |event, state| {
        sink.borrow_mut().push((event, state.cloned()));
    });
    (nav, emissions)
}

fn apply(nav: &mut Nav, op: &Op) -> Vec<Reconciled> {
    match op {
        Op::Push(i) => nav.push(PATHS[*i], None),
        Op::Replace(i) => nav.replace(PATHS[*i], None),
        Op::Back => nav.back(),
        Op::Forward => nav.forward(),
        Op::PressBack => {
            nav.backend_mut().press_back();
        }
        Op::PressForward => {
            nav.backend_mut().press_forward();
        }
        Op::EditUrl => nav.backend_mut().edit_url("#/somewhere"),
        Op::Lock(mode) => nav.lock(*mode),
        Op::Unlock => nav.unlock(),
    }
    nav.pump()
}

fn expected_swipe_len(event: RouterEvent, before: usize) -> usize {
    match event {
        RouterEvent::Push => before + 1,
        RouterEvent::Replace => before,
        RouterEvent::Back => before.saturating_sub(1).max(1),
        RouterEvent::Update => before,
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn navigation_invariants_hold(
        route in prop::sample::select(PATHS),
        ops in prop::collection::vec(op(), 1..60)
    ) {
        let (mut nav, emissions) = navigator(route);

        for op in &ops {
            let prev_state = nav.state().clone();
            let prev_entries = nav.history().entries().to_vec();
            let prev_swipe: Vec<NavId> = nav.swipeback().to_vec();
            let prev_native = nav.backend().entries().to_vec();
            let prev_cursor = nav.backend().cursor();
            let prev_closes = nav.bridge().close_calls();
            let locked_all = nav.lock_mode() == LockMode::All;
            let popstate_only = nav.lock_mode() == LockMode::PopstateOnly;
            emissions.borrow_mut().clear();

            let outcomes = apply(&mut nav, op);

            // 1. Stack never empty.
            prop_assert!(!nav.history().is_empty());
            prop_assert!(!nav.swipeback().is_empty());
            prop_assert_eq!(nav.swipeback().last(), Some(&nav.state().panel));

            // 2. At most one emission, carrying the current state.
            let emitted = emissions.borrow().clone();
            prop_assert!(emitted.len() <= 1, "{:?} emitted {:?}", op, emitted);
            match emitted.first() {
                None => prop_assert_eq!(nav.history().entries(), prev_entries.as_slice()),
                Some((RouterEvent::Update, state)) => {
                    prop_assert!(state.is_none());
                    prop_assert_eq!(nav.history().entries(), prev_entries.as_slice());
                }
                Some((event, state)) => {
                    prop_assert_eq!(state.as_ref(), Some(nav.state()));

                    // 3. View-change rule.
                    if nav.state().view != prev_state.view {
                        prop_assert_eq!(nav.swipeback(), &[nav.state().panel.clone()][..]);
                    } else {
                        prop_assert_eq!(
                            nav.swipeback().len(),
                            expected_swipe_len(*event, prev_swipe.len()),
                            "{:?} after {:?}", event, op
                        );
                    }
                }
            }

            // 4. Lock all freezes.
            if locked_all {
                prop_assert_eq!(nav.history().entries(), prev_entries.as_slice());
                if op.is_programmatic() {
                    prop_assert!(emitted.is_empty());
                    prop_assert_eq!(nav.backend().entries(), prev_native.as_slice());
                    prop_assert_eq!(nav.backend().cursor(), prev_cursor);
                    prop_assert_eq!(nav.bridge().close_calls(), prev_closes);
                }
            }

            // 6. Popstate-only lock.
            if popstate_only {
                if op.is_user_chrome() {
                    prop_assert_eq!(nav.history().entries(), prev_entries.as_slice(), "{:?}", op);
                    prop_assert!(
                        emitted.iter().all(|(event, _)| *event == RouterEvent::Update),
                        "{:?} emitted {:?}", op, emitted
                    );
                    prop_assert!(
                        !outcomes.iter().any(|o| matches!(o, Reconciled::Applied(_))),
                        "{:?} reconciled as {:?}", op, outcomes
                    );
                    if outcomes.iter().any(|o| matches!(o, Reconciled::Cancelled(_))) {
                        prop_assert_eq!(nav.backend().cursor(), prev_cursor);
                    }
                }
                if let Op::Push(_) = op {
                    prop_assert_eq!(nav.history().len(), prev_entries.len() + 1);
                }
            }

            // 5. Close signal.
            if matches!(op, Op::Back) && !locked_all {
                if prev_entries.len() == 1 {
                    prop_assert_eq!(nav.bridge().close_calls(), prev_closes + 1);
                    prop_assert_eq!(nav.backend().cursor(), prev_cursor);
                    prop_assert!(emitted.is_empty());
                } else {
                    prop_assert_eq!(nav.bridge().close_calls(), prev_closes);
                }
            }
        }
    }

    #[test]
    fn pushed_ids_are_unique(paths in prop::collection::vec(prop::sample::select(PATHS), 1..40)) {
        let (mut nav, _) = navigator("/");
        let mut seen = std::collections::HashSet::new();
        for path in paths {
            let id = nav.try_push(path, None).unwrap();
            prop_assert!(seen.insert(id));
        }
    }

    #[test]
    fn replace_never_changes_identity(paths in prop::collection::vec(prop::sample::select(PATHS), 1..20)) {
        let (mut nav, _) = navigator("/a/x");
        let id = nav.state().id;
        let depth = nav.history().len();
        for path in paths {
            nav.replace(path, None);
            prop_assert_eq!(nav.state().id, id);
            prop_assert_eq!(nav.history().len(), depth);
        }
    }
}

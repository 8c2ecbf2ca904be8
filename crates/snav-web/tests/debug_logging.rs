#![forbid(unsafe_code)]

//! Tracing output of the navigator, captured with a registry layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use snav_core::{Options, RootStructure, StructureKind, ViewStructure};
use snav_runtime::Navigator;
use snav_web::{MemoryHistory, RecordingBridge};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

#[derive(Default, Clone)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

impl Capture {
    fn messages(&self, level: tracing::Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .filter_map(|e| e.fields.get("message").cloned())
            .collect()
    }

    fn events_with(&self, message: &str) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.fields.get("message").map(String::as_str) == Some(message))
            .cloned()
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_owned(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_owned(), value.to_owned()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_owned());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

fn structure() -> RootStructure {
    RootStructure::new(
        StructureKind::Root,
        vec![ViewStructure::new("/a", ["/x", "/y"])],
    )
    .unwrap()
}

fn navigator(options: Options) -> Navigator<MemoryHistory, RecordingBridge> {
    Navigator::with_structure(
        options.with_default_route("/a/x"),
        structure(),
        MemoryHistory::new("/"),
        RecordingBridge::embedded(),
    )
}

#[test]
fn debug_option_logs_every_transition() {
    let capture = with_captured_tracing(|| {
        let mut nav = navigator(Options::default().with_debug(true));
        nav.start();
        nav.push("/a/y", None);
        nav.back();
        nav.pump();
    });

    let records = capture.events_with("navigation");
    let kinds: Vec<&str> = records
        .iter()
        .filter_map(|e| e.fields.get("event").map(String::as_str))
        .collect();
    assert_eq!(kinds, vec!["REPLACE", "PUSH", "BACK"]);
    assert!(records.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert!(records[1].fields.contains_key("depth"));
    assert!(
        capture
            .spans
            .lock()
            .unwrap()
            .iter()
            .any(|s| s == "snav.popstate")
    );
}

#[test]
fn transitions_are_quiet_without_debug_option() {
    let capture = with_captured_tracing(|| {
        let mut nav = navigator(Options::default());
        nav.start();
        nav.push("/a/y", None);
    });
    assert!(capture.events_with("navigation").is_empty());
}

#[test]
fn double_start_is_a_diagnostic() {
    let capture = with_captured_tracing(|| {
        let mut nav = navigator(Options::default().with_debug(true));
        nav.start();
        nav.start();
        nav.stop();
        nav.stop();
    });
    let warnings = capture.messages(tracing::Level::WARN);
    assert!(warnings.iter().any(|m| m == "navigator already started"));
    assert!(warnings.iter().any(|m| m == "navigator is not started"));
}

#[test]
fn second_structure_is_rejected_with_error() {
    let capture = with_captured_tracing(|| {
        let mut nav = navigator(Options::default().with_debug(true));
        nav.init_structure(structure());
    });
    assert_eq!(capture.messages(tracing::Level::ERROR).len(), 1);
}

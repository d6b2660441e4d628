//! Tracing setup for the room server.
//!
//! The binary calls [`init_logging`] once. Tests attach a
//! [`TestLogSubscriber`] layer to a local registry and assert on what the
//! room and request code emitted.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::{EnvFilter, Layer};

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,fivepiles_web=debug";

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Structured fields other than `message`, in emission order
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory event sink. Clones share one buffer, so keep a clone and hand
/// the other to [`TestLogSubscriber::into_layer`].
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn find(&self, needle: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.message.contains(needle))
            .cloned()
            .collect()
    }

    pub fn into_layer<S: Subscriber>(self) -> impl Layer<S> {
        CaptureLayer { sink: self }
    }

    // a test that panicked mid-push must not hide the entries from the rest
    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct CaptureLayer {
    sink: TestLogSubscriber,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = EntryCollector::default();
        event.record(&mut collector);
        let meta = event.metadata();
        self.sink.lock().push(LogEntry {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: collector.message,
            fields: collector.fields,
        });
    }
}

#[derive(Default)]
struct EntryCollector {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EntryCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

impl EntryCollector {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            name => self.fields.push((name.to_owned(), value)),
        }
    }
}

/// Installs the global fmt subscriber. A second call is a no-op.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

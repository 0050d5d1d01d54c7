//! Injectable two-channel log sink for lifecycle side effects.
//!
//! The lifecycle controller never writes to process-wide output directly.
//! Everything goes through a [`LogSink`] with two channels (`warn`, `info`),
//! so hosts can route emissions to a console, a file, or a remote collector,
//! and tests can capture them without scraping stderr.
//!
//! Sink selection is two-tier:
//!
//! - Explicit: `*_with_sink` constructors and [`crate::StructuredError::print_to`]
//!   take a `&dyn LogSink` directly. Preferred in tests.
//! - Ambient: everything else resolves through the process-global sink, which
//!   defaults to [`StderrSink`] and can be swapped with [`set_global_sink`].
//!
//! Writes are fire-and-forget: a sink must not fail, and the lifecycle
//! controller never inspects a result.

use smallvec::SmallVec;
use std::sync::{Arc, Mutex, RwLock};

/// Logging channel selected by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Loud channel for unacknowledged failures.
    Warn,
    /// Informational channel for low-severity and handling confirmations.
    Info,
}

/// Two-channel write interface the lifecycle controller emits through.
///
/// Implementations must be infallible from the caller's perspective; drop
/// entries on internal failure rather than propagating.
pub trait LogSink: Send + Sync {
    /// Write an entry to the warn channel.
    fn warn(&self, entry: &str);

    /// Write an entry to the info channel.
    fn info(&self, entry: &str);

    /// Dispatch an entry to the given channel.
    #[inline]
    fn write(&self, channel: Channel, entry: &str) {
        match channel {
            Channel::Warn => self.warn(entry),
            Channel::Info => self.info(entry),
        }
    }
}

/// Default sink: warn channel to stderr, info channel to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn warn(&self, entry: &str) {
        eprintln!("{entry}");
    }

    fn info(&self, entry: &str) {
        println!("{entry}");
    }
}

/// A single captured emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Channel the entry was written to.
    pub channel: Channel,
    /// Rendered entry body.
    pub body: String,
}

/// Capture sink for tests and embedded inspection.
///
/// Events are buffered in insertion order behind a mutex. The inline
/// capacity covers typical test scenarios without heap allocation.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<SmallVec<[LogEvent; 8]>>,
}

impl MemorySink {
    /// Create an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured events, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|guard| guard.to_vec())
            .unwrap_or_default()
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// True when nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all captured events.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }

    fn push(&self, channel: Channel, entry: &str) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(LogEvent {
                channel,
                body: entry.to_string(),
            });
        }
    }
}

impl LogSink for MemorySink {
    fn warn(&self, entry: &str) {
        self.push(Channel::Warn, entry);
    }

    fn info(&self, entry: &str) {
        self.push(Channel::Info, entry);
    }
}

// ============================================================================
// Process-global sink
// ============================================================================

static GLOBAL_SINK: RwLock<Option<Arc<dyn LogSink>>> = RwLock::new(None);

/// Replace the process-global sink used by ambient emissions.
///
/// Affects every construction and handling emission that does not carry an
/// explicit sink. Intended for host initialization; tests that need capture
/// should prefer the `*_with_sink` APIs to stay isolated.
pub fn set_global_sink(sink: Arc<dyn LogSink>) {
    if let Ok(mut guard) = GLOBAL_SINK.write() {
        *guard = Some(sink);
    }
}

/// Revert ambient emissions to the default [`StderrSink`].
pub fn clear_global_sink() {
    if let Ok(mut guard) = GLOBAL_SINK.write() {
        *guard = None;
    }
}

/// Run `f` against the current ambient sink.
pub(crate) fn with_global_sink(f: impl FnOnce(&dyn LogSink)) {
    if let Ok(guard) = GLOBAL_SINK.read() {
        if let Some(sink) = guard.as_ref() {
            f(sink.as_ref());
            return;
        }
    }
    f(&StderrSink)
}

//! # Strata Errors
//!
//! Structured, serializable errors with provenance-preserving normalization.
//!
//! ## Design Philosophy
//!
//! 1. **One uniform shape**: every failure, however it was raised, ends up a
//!    [`StructuredError`] carrying code, message, name, severity, info, stack
//! 2. **Provenance is never dropped**: wrapping a foreign failure stores the
//!    original verbatim under a reserved info key for forensic inspection
//! 3. **Fail loud unless acknowledged**: unhandled high/medium-severity
//!    errors log at construction; silence requires an explicit opt-out or
//!    an explicit [`StructuredError::handle`] call
//! 4. **Handling is terminal**: the first `handle` call wins, every later
//!    call is a boolean no-op
//! 5. **Round trips preserve identity**: serialized errors carry a
//!    discriminator tag and revive into equal-by-contents instances, even
//!    nested deep inside a larger document
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_errors::{ErrorProps, Severity, StructuredError};
//!
//! let err = StructuredError::new(
//!     ErrorProps::new()
//!         .code("CONFIG_INVALID")
//!         .message("threshold must be between 0 and 100")
//!         .severity(Severity::None),
//! )
//! .expect("info is an object");
//!
//! assert_eq!(err.code(), "CONFIG_INVALID");
//! assert!(!err.is_handled());
//! ```
//!
//! ## Normalizing foreign failures
//!
//! ```rust
//! use strata_errors::{ErrorDefaults, Severity, StructuredError};
//! use std::io;
//!
//! let io_err = io::Error::new(io::ErrorKind::NotFound, "missing.toml");
//! let err = StructuredError::transform(
//!     io_err,
//!     ErrorDefaults::new("CONFIG_READ_FAILED").severity(Severity::None),
//! );
//!
//! assert_eq!(err.code(), "CONFIG_READ_FAILED");
//! // The original failure survives verbatim inside `info`.
//! let original = &err.info()["originalError"];
//! assert_eq!(original["message"], "missing.toml");
//! ```
//!
//! ## Round-tripping through JSON
//!
//! ```rust
//! use strata_errors::{ErrorProps, Severity, StructuredError};
//!
//! let err = StructuredError::new(
//!     ErrorProps::new()
//!         .code("SYNC_STALLED")
//!         .message("replica lag exceeded budget")
//!         .severity(Severity::None),
//! )
//! .expect("info is an object");
//!
//! let text = err.to_json_string();
//! let revived = StructuredError::from_json_str(&text).expect("tagged envelope");
//! assert_eq!(revived, err);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde_json::{Map, Value};
use std::backtrace::Backtrace;
use std::fmt;
use std::result;

pub mod codec;
pub mod definitions;
pub mod logging;
pub mod props;
pub mod severity;
pub mod transform;

pub use codec::Revived;
pub use logging::{Channel, LogEvent, LogSink, MemorySink, StderrSink};
pub use props::{ErrorDefaults, ErrorProps};
pub use severity::{ParseSeverityError, Severity};
pub use transform::{ErrorSource, NativeSnapshot};

/// Type alias for Results using the structured error type.
///
/// The error side is boxed: a [`StructuredError`] owns several strings and a
/// map, and fat `Err` variants tax every call site that returns `Ok`.
pub type Result<T> = result::Result<T, Box<StructuredError>>;

/// Substitute the construction sentinel for absent or empty values.
pub(crate) fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => sentinel.to_string(),
    }
}

/// The uniform error value: a native error augmented with machine-readable
/// metadata, contextual info, and handling state.
///
/// # Key Properties
///
/// - `code`, `message`, `name`, and `stack` are immutable after construction
/// - `severity` mutates only through [`handle`](Self::handle) and
///   [`change_severity`](Self::change_severity); `Handled` is terminal
/// - `info` grows additively through [`add_info`](Self::add_info); existing
///   keys are never overwritten and never deleted
/// - wrapping another failure keeps the original verbatim under the
///   reserved `"originalError"` info key
/// - serialization is lossless; a revived instance compares equal on every
///   field, stack text included
#[must_use = "errors should be handled or logged"]
#[derive(Clone, PartialEq)]
pub struct StructuredError {
    code: String,
    message: String,
    name: String,
    severity: Severity,
    info: Map<String, Value>,
    stack: String,
}

impl StructuredError {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Construct from optional props, emitting to the ambient sink.
    ///
    /// Absent `code`/`message`/`name` take their sentinels, `severity`
    /// defaults to `High`, `info` to an empty map, and `stack` to a freshly
    /// captured trace. Unless `props.quiet` is set, construction logs the
    /// rendered error on the channel selected by severity (`High`/`Medium`
    /// warn, `Low` info, `None`/`Handled` silent).
    ///
    /// # Errors
    ///
    /// A present `props.info` that is not a JSON object fails construction.
    /// The failure itself is a `StructuredError` with code
    /// `"CONSTRUCTION_ERROR"`, built from literal parts so this path cannot
    /// recurse, and returned as the `Err` value.
    pub fn new(props: ErrorProps) -> Result<Self> {
        Self::build(props, None)
    }

    /// Construct like [`new`](Self::new) but emit through an explicit sink.
    pub fn new_with_sink(props: ErrorProps, sink: &dyn LogSink) -> Result<Self> {
        Self::build(props, Some(sink))
    }

    fn build(props: ErrorProps, sink: Option<&dyn LogSink>) -> Result<Self> {
        let info = match props.info {
            Some(Value::Object(map)) => map,
            Some(rejected) => {
                return Err(Box::new(Self::construction_failure(rejected, sink)));
            }
            None => Map::new(),
        };

        let err = Self::from_parts(
            or_sentinel(props.code, definitions::CODE_MISSING),
            or_sentinel(props.message, definitions::MESSAGE_MISSING),
            or_sentinel(props.name, definitions::DEFAULT_NAME),
            props.severity.unwrap_or_default(),
            info,
            match props.stack {
                Some(s) if !s.is_empty() => s,
                _ => Self::capture_stack(),
            },
        );

        if !props.quiet {
            err.emit_construction(sink);
        }
        Ok(err)
    }

    /// Fallback error describing a failed construction attempt.
    ///
    /// Built only from literal, pre-validated parts; it cannot fail and
    /// cannot re-enter the validating path.
    fn construction_failure(rejected: Value, sink: Option<&dyn LogSink>) -> Self {
        let mut info = Map::new();
        info.insert(definitions::REJECTED_INFO_KEY.to_string(), rejected);

        let err = Self::from_parts(
            definitions::CONSTRUCTION_ERROR.to_string(),
            "props.info must be a JSON object".to_string(),
            definitions::DEFAULT_NAME.to_string(),
            Severity::High,
            info,
            Self::capture_stack(),
        );
        err.emit_construction(sink);
        err
    }

    /// Infallible assembly from already-validated parts. No logging.
    pub(crate) fn from_parts(
        code: String,
        message: String,
        name: String,
        severity: Severity,
        info: Map<String, Value>,
        stack: String,
    ) -> Self {
        Self {
            code,
            message,
            name,
            severity,
            info,
            stack,
        }
    }

    pub(crate) fn capture_stack() -> String {
        Backtrace::force_capture().to_string()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Machine-readable identifier.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Classification label.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current severity.
    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Contextual info map.
    #[inline]
    pub const fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Captured stack text.
    #[inline]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Derived handled view: true iff severity is `Handled`.
    #[inline]
    pub const fn is_handled(&self) -> bool {
        self.severity.is_handled()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Mark this error handled, emitting to the ambient sink.
    ///
    /// First call on an unhandled instance: severity becomes `Handled`,
    /// `handled_info` (if given) merges additively into `info`, a
    /// confirmation is written to the info channel, and `true` is returned.
    /// Every later call mutates nothing, logs nothing, and returns `false`.
    ///
    /// An object `handled_info` merges key-wise; any other value lands under
    /// the reserved `"handledInfo"` key if that key is still free.
    pub fn handle(&mut self, handled_info: Option<Value>) -> bool {
        self.handle_inner(handled_info, None)
    }

    /// [`handle`](Self::handle) with an explicit sink.
    pub fn handle_with_sink(&mut self, handled_info: Option<Value>, sink: &dyn LogSink) -> bool {
        self.handle_inner(handled_info, Some(sink))
    }

    fn handle_inner(&mut self, handled_info: Option<Value>, sink: Option<&dyn LogSink>) -> bool {
        if self.severity.is_handled() {
            return false;
        }
        self.severity = Severity::Handled;

        match handled_info {
            Some(Value::Object(map)) => self.add_info(&map),
            Some(other) => {
                self.info
                    .entry(definitions::HANDLED_INFO_KEY)
                    .or_insert(other);
            }
            None => {}
        }

        self.emit(Channel::Info, sink);
        true
    }

    /// Merge entries into `info` additively.
    ///
    /// Keys already present keep their existing value; merging never
    /// overwrites and never deletes, so prior context cannot be lost.
    pub fn add_info(&mut self, extra: &Map<String, Value>) {
        for (key, value) in extra {
            self.info
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Re-classify severity between non-terminal states.
    ///
    /// Returns `false` without mutating when the error is already handled;
    /// the state machine has no way back out of `Handled`. Setting
    /// `Severity::Handled` here acknowledges silently, without the
    /// confirmation log [`handle`](Self::handle) emits.
    pub fn change_severity(&mut self, severity: Severity) -> bool {
        if self.severity.is_handled() {
            return false;
        }
        self.severity = severity;
        true
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    /// Deterministic human-readable block.
    ///
    /// Header line (`name - code (severity)`), the message, a pretty-printed
    /// rendering of `info` when non-empty, and the stack with its first line
    /// stripped. Total output never panics, even with empty info or a
    /// single-line stack.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} - {} ({})\n{}",
            self.name, self.code, self.severity, self.message
        );

        if !self.info.is_empty() {
            if let Ok(pretty) = serde_json::to_string_pretty(&self.info) {
                out.push('\n');
                out.push_str(&pretty);
            }
        }

        let mut frames = self.stack.lines();
        let _ = frames.next(); // first line repeats the header
        for frame in frames {
            out.push('\n');
            out.push_str(frame);
        }
        out
    }

    /// Write the rendered block to the ambient sink.
    pub fn print(&self) {
        logging::with_global_sink(|sink| self.print_to(sink));
    }

    /// Write the rendered block to an explicit sink.
    ///
    /// Routed by severity; silent severities fall through to the info
    /// channel so a direct print always produces output.
    pub fn print_to(&self, sink: &dyn LogSink) {
        let channel = self.severity.channel().unwrap_or(Channel::Info);
        sink.write(channel, &self.render());
    }

    /// Lifecycle emission on the severity-selected channel, if any.
    pub(crate) fn emit_construction(&self, sink: Option<&dyn LogSink>) {
        if let Some(channel) = self.severity.channel() {
            self.emit(channel, sink);
        }
    }

    fn emit(&self, channel: Channel, sink: Option<&dyn LogSink>) {
        let body = self.render();
        match sink {
            Some(sink) => sink.write(channel, &body),
            None => logging::with_global_sink(|sink| sink.write(channel, &body)),
        }
    }
}

impl fmt::Display for StructuredError {
    /// One-line header used by hosts that format through `std::error::Error`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}): {}",
            self.name, self.code, self.severity, self.message
        )
    }
}

impl fmt::Debug for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredError")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("info", &self.info)
            .field("stack", &"<captured>")
            .finish()
    }
}

impl std::error::Error for StructuredError {}

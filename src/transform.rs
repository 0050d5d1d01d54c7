//! Normalization of arbitrary failure values into [`StructuredError`].
//!
//! Heterogeneous call sites fail in heterogeneous ways: library errors,
//! rejected values, bare strings. [`StructuredError::transform`] coerces any
//! of them into the uniform shape while keeping the original verbatim under
//! the reserved `"originalError"` info key, so no wrap operation ever
//! discards the triggering failure.
//!
//! The transform never fails and always returns a value. Dispatch happens on
//! [`ErrorSource`], the three-way category split of inputs:
//!
//! 1. already structured — returned as-is, defaults merged into info only
//! 2. a native error — snapshotted (message, kind, cause chain) and wrapped
//! 3. anything else — a JSON value wrapped verbatim

use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::io;

use crate::logging::LogSink;
use crate::props::ErrorDefaults;
use crate::{definitions, or_sentinel, StructuredError};

/// Snapshot of a native error captured before wrapping.
///
/// Native errors are not serializable and not clonable, so the normalizer
/// records the pieces forensics actually needs: the message, an optional
/// kind label, and the messages of the `source()` chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeSnapshot {
    /// The error's display message.
    pub message: String,
    /// Concrete kind label where the source type exposes one
    /// (`io::ErrorKind`, `serde_json` error category).
    pub kind: Option<String>,
    /// Display messages of the `source()` chain, outermost first.
    pub chain: Vec<String>,
    /// Stack text to inherit, when the producing context captured one.
    pub stack: Option<String>,
}

impl NativeSnapshot {
    /// Capture a snapshot from any error trait object, walking its
    /// `source()` chain.
    pub fn capture(error: &(dyn StdError + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            kind: None,
            chain,
            stack: None,
        }
    }

    /// Attach a kind label.
    #[inline]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Attach stack text for the wrapped error to inherit.
    #[inline]
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// The JSON record stored under the `"originalError"` info key.
    pub(crate) fn to_info_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "message".to_string(),
            Value::String(self.message.clone()),
        );
        if let Some(kind) = &self.kind {
            map.insert("kind".to_string(), Value::String(kind.clone()));
        }
        if !self.chain.is_empty() {
            map.insert(
                "chain".to_string(),
                Value::Array(
                    self.chain
                        .iter()
                        .map(|cause| Value::String(cause.clone()))
                        .collect(),
                ),
            );
        }
        Value::Object(map)
    }
}

/// Runtime category of a value entering [`StructuredError::transform`].
#[derive(Debug)]
pub enum ErrorSource {
    /// Already the uniform type; passes through with info enrichment only.
    Structured(StructuredError),
    /// A native error, captured as a snapshot.
    Native(NativeSnapshot),
    /// Any other value, wrapped verbatim.
    Value(Value),
}

impl ErrorSource {
    /// Categorize an arbitrary error trait object.
    ///
    /// Use the `From` impls for concrete types; this entry point exists for
    /// `&dyn Error` values whose concrete type is unknown at the call site.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        Self::Native(NativeSnapshot::capture(error))
    }
}

impl From<StructuredError> for ErrorSource {
    fn from(error: StructuredError) -> Self {
        Self::Structured(error)
    }
}

impl From<NativeSnapshot> for ErrorSource {
    fn from(snapshot: NativeSnapshot) -> Self {
        Self::Native(snapshot)
    }
}

impl From<io::Error> for ErrorSource {
    fn from(error: io::Error) -> Self {
        let kind = format!("{:?}", error.kind());
        Self::Native(NativeSnapshot::capture(&error).kind(kind))
    }
}

impl From<serde_json::Error> for ErrorSource {
    fn from(error: serde_json::Error) -> Self {
        let kind = match error.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        };
        Self::Native(NativeSnapshot::capture(&error).kind(kind))
    }
}

impl From<Value> for ErrorSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ErrorSource {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ErrorSource {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl StructuredError {
    /// Coerce an arbitrary failure value into a `StructuredError`.
    ///
    /// Never fails; always returns a value. Behavior by category:
    ///
    /// - **Already structured**: returned unchanged except `defaults.info`
    ///   merges additively into its info. No other field is touched (the
    ///   non-overwriting policy), no `"originalError"` key is added, and no
    ///   log is emitted.
    /// - **Native error**: a new instance whose message and stack come from
    ///   the snapshot unless `defaults` overrides them, whose code, name,
    ///   and severity come from `defaults`, and whose info is
    ///   `defaults.info` plus the snapshot under `"originalError"`.
    /// - **Other value**: a new instance built entirely from `defaults`,
    ///   with the value verbatim under `"originalError"`.
    ///
    /// Newly constructed instances emit on the severity-selected channel
    /// like direct construction.
    pub fn transform(source: impl Into<ErrorSource>, defaults: ErrorDefaults) -> StructuredError {
        Self::transform_inner(source.into(), defaults, None)
    }

    /// [`transform`](Self::transform) with an explicit sink.
    pub fn transform_with_sink(
        source: impl Into<ErrorSource>,
        defaults: ErrorDefaults,
        sink: &dyn LogSink,
    ) -> StructuredError {
        Self::transform_inner(source.into(), defaults, Some(sink))
    }

    fn transform_inner(
        source: ErrorSource,
        defaults: ErrorDefaults,
        sink: Option<&dyn LogSink>,
    ) -> StructuredError {
        match source {
            ErrorSource::Structured(mut err) => {
                if let Some(extra) = defaults.info {
                    err.add_info(&extra);
                }
                err
            }
            ErrorSource::Native(snapshot) => {
                let mut info = defaults.info.unwrap_or_default();
                info.entry(definitions::ORIGINAL_ERROR_KEY)
                    .or_insert_with(|| snapshot.to_info_value());

                let err = StructuredError::from_parts(
                    or_sentinel(Some(defaults.code), definitions::CODE_MISSING),
                    or_sentinel(
                        defaults.message.or(Some(snapshot.message)),
                        definitions::MESSAGE_MISSING,
                    ),
                    or_sentinel(defaults.name, definitions::DEFAULT_NAME),
                    defaults.severity.unwrap_or_default(),
                    info,
                    match snapshot.stack {
                        Some(stack) if !stack.is_empty() => stack,
                        _ => StructuredError::capture_stack(),
                    },
                );
                err.emit_construction(sink);
                err
            }
            ErrorSource::Value(value) => {
                let mut info = defaults.info.unwrap_or_default();
                info.entry(definitions::ORIGINAL_ERROR_KEY).or_insert(value);

                let err = StructuredError::from_parts(
                    or_sentinel(Some(defaults.code), definitions::CODE_MISSING),
                    or_sentinel(defaults.message, definitions::MESSAGE_MISSING),
                    or_sentinel(defaults.name, definitions::DEFAULT_NAME),
                    defaults.severity.unwrap_or_default(),
                    info,
                    StructuredError::capture_stack(),
                );
                err.emit_construction(sink);
                err
            }
        }
    }
}

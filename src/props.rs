//! Construction records: optional props for direct construction and
//! defaults for normalization.
//!
//! Both records are plain data with chainable setters. Everything on
//! [`ErrorProps`] is optional; sentinel substitution happens inside the
//! constructor, not here. [`ErrorDefaults`] requires a `code` because the
//! normalizer's whole point is stamping a machine-readable identity onto a
//! foreign failure.

use crate::Severity;
use serde_json::{Map, Value};

/// Optional inputs for [`crate::StructuredError::new`].
///
/// `info` is accepted as a loose [`Value`] so call sites can pass the output
/// of `serde_json::json!` directly; a present non-object value triggers the
/// construction-failure path.
///
/// # Example
///
/// ```rust
/// use strata_errors::{ErrorProps, Severity, StructuredError};
///
/// let err = StructuredError::new(
///     ErrorProps::new()
///         .code("CONFIG_INVALID")
///         .message("threshold out of range")
///         .severity(Severity::Low)
///         .quiet(),
/// )
/// .expect("object info");
/// assert_eq!(err.code(), "CONFIG_INVALID");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorProps {
    /// Machine-readable identifier; sentinel-substituted when absent.
    pub code: Option<String>,
    /// Human-readable description; sentinel-substituted when absent.
    pub message: Option<String>,
    /// Classification label; defaults to the fixed type name.
    pub name: Option<String>,
    /// Urgency level; defaults to [`Severity::High`].
    pub severity: Option<Severity>,
    /// Contextual data; must be a JSON object when present.
    pub info: Option<Value>,
    /// Pre-captured stack text; captured fresh when absent.
    pub stack: Option<String>,
    /// Suppress the construction log emission.
    pub quiet: bool,
}

impl ErrorProps {
    /// Empty props; every field takes its construction default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine-readable code.
    #[inline]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the human-readable message.
    #[inline]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the classification label.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the severity.
    #[inline]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Attach contextual info. Must serialize to a JSON object.
    #[inline]
    pub fn info(mut self, info: impl Into<Value>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Supply pre-captured stack text instead of capturing fresh.
    #[inline]
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Suppress the construction log emission.
    #[inline]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

/// Defaults applied by [`crate::StructuredError::transform`] when coercing a
/// foreign failure into a structured error.
///
/// `code` is mandatory; everything else falls back to the wrapped source or
/// the construction sentinels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDefaults {
    /// Code stamped onto the normalized error.
    pub code: String,
    /// Message override; the wrapped source's message is used when absent.
    pub message: Option<String>,
    /// Classification label override.
    pub name: Option<String>,
    /// Severity for the normalized error; defaults to [`Severity::High`].
    pub severity: Option<Severity>,
    /// Info entries merged into the normalized error's info map.
    pub info: Option<Map<String, Value>>,
}

impl ErrorDefaults {
    /// Defaults carrying only a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Set the message override.
    #[inline]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the classification label override.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the severity.
    #[inline]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set the info entries to merge.
    #[inline]
    pub fn info(mut self, info: Map<String, Value>) -> Self {
        self.info = Some(info);
        self
    }
}

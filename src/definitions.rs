//! Sentinel values, reserved codes, and reserved keys.
//!
//! # Taxonomy & Governance
//!
//! Every string constant that carries cross-boundary meaning lives here:
//! the sentinels substituted for absent fields at construction time, the
//! codes the crate itself raises, the reserved `info` keys, and the
//! serialization envelope discriminator. Keeping them in one module makes
//! the wire contract auditable at a glance and prevents ad-hoc drift in
//! call sites.
//!
//! Sentinels are part of the data-model invariant: `code`, `message`, and
//! `name` are never empty at rest. Absence is always replaced by the
//! constants below, so downstream consumers can match on them rather than
//! on empty strings.

// ============================================================================
// Construction sentinels
// ============================================================================

/// Substituted for an absent or empty `code` at construction time.
pub const CODE_MISSING: &str = "CODE_MISSING";

/// Substituted for an absent or empty `message` at construction time.
pub const MESSAGE_MISSING: &str = "Message Missing";

/// Default classification label for errors constructed without a `name`.
pub const DEFAULT_NAME: &str = "Structured Error";

// ============================================================================
// Codes raised by this crate
// ============================================================================

/// Carried by the fallback error produced when construction itself fails
/// (for example, a `props.info` value that is not a JSON object).
pub const CONSTRUCTION_ERROR: &str = "CONSTRUCTION_ERROR";

/// Carried by errors normalized from a failed JSON parse during revival.
pub const PARSE_ERROR: &str = "PARSE_ERROR";

// ============================================================================
// Reserved info keys
// ============================================================================

/// Info key holding the wrapped original failure after normalization.
///
/// Stable across any number of wrap operations; forensic tooling keys off it.
pub const ORIGINAL_ERROR_KEY: &str = "originalError";

/// Info key receiving non-object handling metadata passed to `handle`.
pub const HANDLED_INFO_KEY: &str = "handledInfo";

/// Info key recording the rejected value on the construction-failure path.
pub const REJECTED_INFO_KEY: &str = "rejectedInfo";

// ============================================================================
// Serialization envelope
// ============================================================================

/// Discriminator key attached to every serialized error record.
pub const ENVELOPE_TAG_KEY: &str = "_revive";

/// Discriminator value identifying a record as a serialized [`crate::StructuredError`].
pub const ENVELOPE_TAG: &str = "StructuredError";

//! Severity classification for structured errors.
//!
//! Severity does double duty: it selects the logging channel used by the
//! lifecycle side effects, and it encodes the handled/unhandled state machine.
//! `Handled` is the single terminal state; every other variant counts as
//! unhandled. A boolean "handled" view is derivable via [`Severity::is_handled`],
//! so callers migrating from flag-based error shapes need no second field.
//!
//! # Channel mapping
//!
//! | Severity  | Channel |
//! |-----------|---------|
//! | `High`    | warn    |
//! | `Medium`  | warn    |
//! | `Low`     | info    |
//! | `None`    | silent  |
//! | `Handled` | silent  |

use crate::logging::Channel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency classification governing logging verbosity and handled state.
///
/// Serializes as the screaming-snake wire labels (`"HIGH"`, `"MEDIUM"`,
/// `"LOW"`, `"NONE"`, `"HANDLED"`) so serialized documents stay readable
/// and stable across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Urgent failure. Loud by default: logged on the warn channel at construction.
    #[default]
    High,
    /// Notable failure, also routed to the warn channel.
    Medium,
    /// Expected or recoverable failure, routed to the info channel.
    Low,
    /// Constructed silently; no log emission.
    None,
    /// Terminal acknowledged state. Silent, and [`crate::StructuredError::handle`]
    /// becomes a no-op once reached.
    Handled,
}

impl Severity {
    /// Wire label for this severity, matching the serialized form.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::None => "NONE",
            Self::Handled => "HANDLED",
        }
    }

    /// True iff this is the terminal `Handled` state.
    #[inline]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }

    /// Logging channel used for lifecycle emissions at this severity.
    ///
    /// `None` means the lifecycle controller stays silent.
    #[inline]
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::High | Self::Medium => Some(Channel::Warn),
            Self::Low => Some(Channel::Info),
            Self::None | Self::Handled => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for severity label parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError {
    /// The label that failed to parse.
    pub value: String,
}

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized severity label '{}'", self.value)
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            "NONE" => Ok(Self::None),
            "HANDLED" => Ok(Self::Handled),
            other => Err(ParseSeverityError {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_high() {
        assert_eq!(Severity::default(), Severity::High);
    }

    #[test]
    fn channel_mapping() {
        assert_eq!(Severity::High.channel(), Some(Channel::Warn));
        assert_eq!(Severity::Medium.channel(), Some(Channel::Warn));
        assert_eq!(Severity::Low.channel(), Some(Channel::Info));
        assert_eq!(Severity::None.channel(), None);
        assert_eq!(Severity::Handled.channel(), None);
    }

    #[test]
    fn only_handled_is_terminal() {
        for severity in [
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::None,
        ] {
            assert!(!severity.is_handled());
        }
        assert!(Severity::Handled.is_handled());
    }

    #[test]
    fn parse_round_trips_labels() {
        for severity in [
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::None,
            Severity::Handled,
        ] {
            assert_eq!(severity.as_str().parse::<Severity>(), Ok(severity));
        }
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        let err = "SHOUTING".parse::<Severity>().unwrap_err();
        assert_eq!(err.value, "SHOUTING");
    }

    #[test]
    fn serde_labels_match_as_str() {
        let json = serde_json::to_string(&Severity::Handled).unwrap();
        assert_eq!(json, "\"HANDLED\"");
        let back: Severity = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(back, Severity::Medium);
    }
}

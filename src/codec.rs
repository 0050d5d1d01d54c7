//! Serialization codec: lossless JSON round trips with type identity.
//!
//! A serialized [`StructuredError`] is a plain JSON object carrying every
//! externally visible field plus the envelope discriminator pair
//! `"_revive": "StructuredError"`. The tag is what disambiguates a serialized
//! instance from an arbitrary object during generic deserialization, so a
//! structured error nested anywhere inside a larger document can be revived
//! in place.
//!
//! Revival re-enters the ordinary construction path: fields present in the
//! record are kept verbatim (stack text included), absent fields take the
//! construction sentinels, and unhandled revived instances emit on the
//! ambient sink exactly like direct construction. What round trips is the
//! final recorded state, not its history.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::props::ErrorDefaults;
use crate::{definitions, or_sentinel, Severity, StructuredError};

// ============================================================================
// Envelope
// ============================================================================

/// Wire mirror of a serialized error record. All fields optional so partial
/// or hand-written records still revive with sentinel substitution.
#[derive(Deserialize)]
struct Envelope {
    code: Option<String>,
    message: Option<String>,
    name: Option<String>,
    severity: Option<Severity>,
    info: Option<Map<String, Value>>,
    stack: Option<String>,
}

impl Envelope {
    /// Manual decode from an already-parsed object, used by the reviver walk
    /// after the discriminator tag has been stripped.
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            code: take_string(&mut map, "code"),
            message: take_string(&mut map, "message"),
            name: take_string(&mut map, "name"),
            severity: match map.remove("severity") {
                Some(Value::String(label)) => label.parse().ok(),
                _ => None,
            },
            info: match map.remove("info") {
                Some(Value::Object(info)) => Some(info),
                _ => None,
            },
            stack: take_string(&mut map, "stack"),
        }
    }

    /// Reconstruct, applying sentinels only where fields are absent.
    fn into_error(self) -> StructuredError {
        let err = StructuredError::from_parts(
            or_sentinel(self.code, definitions::CODE_MISSING),
            or_sentinel(self.message, definitions::MESSAGE_MISSING),
            or_sentinel(self.name, definitions::DEFAULT_NAME),
            self.severity.unwrap_or_default(),
            self.info.unwrap_or_default(),
            match self.stack {
                Some(stack) if !stack.is_empty() => stack,
                _ => StructuredError::capture_stack(),
            },
        );
        err.emit_construction(None);
        err
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

impl Serialize for StructuredError {
    /// Emits the full record plus the discriminator tag, so nesting a
    /// `StructuredError` inside any serde-serialized document produces a
    /// revivable envelope.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry(definitions::ENVELOPE_TAG_KEY, definitions::ENVELOPE_TAG)?;
        map.serialize_entry("name", self.name())?;
        map.serialize_entry("code", self.code())?;
        map.serialize_entry("message", self.message())?;
        map.serialize_entry("severity", &self.severity())?;
        map.serialize_entry("info", self.info())?;
        map.serialize_entry("stack", self.stack())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for StructuredError {
    /// Lenient record revival: the discriminator tag is not required here
    /// because the target type is already known. Absent fields take the
    /// construction sentinels.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Envelope::deserialize(deserializer).map(Envelope::into_error)
    }
}

// ============================================================================
// Revived documents
// ============================================================================

/// A parsed document in which every tagged envelope has been revived.
///
/// Objects bearing the envelope tag become [`StructuredError`] nodes, and
/// every sibling value passes through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Revived {
    /// A revived structured error.
    Error(Box<StructuredError>),
    /// An array whose elements were each revived independently.
    Array(Vec<Revived>),
    /// An object whose values were each revived independently.
    Object(BTreeMap<String, Revived>),
    /// Any other JSON value, passed through verbatim.
    Value(Value),
}

impl Revived {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let tagged = map
                    .get(definitions::ENVELOPE_TAG_KEY)
                    .and_then(Value::as_str)
                    == Some(definitions::ENVELOPE_TAG);
                if tagged {
                    map.remove(definitions::ENVELOPE_TAG_KEY);
                    return Self::Error(Box::new(Envelope::from_map(map).into_error()));
                }
                Self::Object(
                    map.into_iter()
                        .map(|(key, nested)| (key, Self::from_value(nested)))
                        .collect(),
                )
            }
            Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_value).collect())
            }
            other => Self::Value(other),
        }
    }

    /// The revived error at this node, if it is one.
    pub fn as_error(&self) -> Option<&StructuredError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Consume the node, yielding the revived error if it is one.
    pub fn into_error(self) -> Option<StructuredError> {
        match self {
            Self::Error(err) => Some(*err),
            _ => None,
        }
    }

    /// The pass-through value at this node, if it is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Member lookup on an object node.
    pub fn get(&self, key: &str) -> Option<&Revived> {
        match self {
            Self::Object(members) => members.get(key),
            _ => None,
        }
    }

    /// Element lookup on an array node.
    pub fn index(&self, i: usize) -> Option<&Revived> {
        match self {
            Self::Array(items) => items.get(i),
            _ => None,
        }
    }

    /// True iff this node is a revived error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

// ============================================================================
// Parse / stringify surface
// ============================================================================

impl StructuredError {
    /// Plain record of every externally visible field, without the tag.
    pub fn to_object(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name().to_string()));
        map.insert("code".to_string(), Value::String(self.code().to_string()));
        map.insert(
            "message".to_string(),
            Value::String(self.message().to_string()),
        );
        map.insert(
            "severity".to_string(),
            Value::String(self.severity().as_str().to_string()),
        );
        map.insert("info".to_string(), Value::Object(self.info().clone()));
        map.insert("stack".to_string(), Value::String(self.stack().to_string()));
        map
    }

    /// Tagged record: [`to_object`](Self::to_object) plus the envelope
    /// discriminator, identical to the `Serialize` output.
    pub fn to_json(&self) -> Value {
        let mut map = self.to_object();
        map.insert(
            definitions::ENVELOPE_TAG_KEY.to_string(),
            Value::String(definitions::ENVELOPE_TAG.to_string()),
        );
        Value::Object(map)
    }

    /// Compact JSON text of the tagged record. Infallible: the record is
    /// built from already-valid JSON values.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse a JSON document, reviving every tagged envelope inside it.
    ///
    /// # Errors
    ///
    /// A malformed document is itself normalized: the parse failure runs
    /// through [`transform`](Self::transform) with code `"PARSE_ERROR"` at
    /// high severity and comes back as the `Err` value.
    pub fn parse(text: &str) -> crate::Result<Revived> {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Ok(Revived::from_value(value)),
            Err(parse_err) => Err(Box::new(Self::transform(
                parse_err,
                ErrorDefaults::new(definitions::PARSE_ERROR).severity(Severity::High),
            ))),
        }
    }

    /// Like [`parse`](Self::parse), but a malformed document comes back as a
    /// [`Revived::Error`] node instead of an `Err` — for callers that want a
    /// value either way.
    pub fn parse_lenient(text: &str) -> Revived {
        match Self::parse(text) {
            Ok(revived) => revived,
            Err(err) => Revived::Error(err),
        }
    }

    /// Revive a document whose root must be a tagged envelope.
    ///
    /// # Errors
    ///
    /// Malformed text errors like [`parse`](Self::parse); a well-formed root
    /// that is not a tagged envelope is normalized under the same
    /// `"PARSE_ERROR"` code with the offending root preserved as provenance.
    pub fn from_json_str(text: &str) -> crate::Result<StructuredError> {
        match Self::parse(text)? {
            Revived::Error(err) => Ok(*err),
            other => {
                let root = match other {
                    Revived::Value(value) => value,
                    _ => serde_json::from_str(text).unwrap_or(Value::Null),
                };
                Err(Box::new(Self::transform(
                    root,
                    ErrorDefaults::new(definitions::PARSE_ERROR)
                        .message("document root is not a serialized StructuredError")
                        .severity(Severity::High),
                )))
            }
        }
    }
}

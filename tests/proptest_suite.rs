//! Property-based tests for strata_errors
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use strata_errors::{
    definitions, logging, ErrorDefaults, ErrorProps, MemorySink, Revived, Severity,
    StructuredError,
};

/// Route ambient emissions (revival logging) into a capture sink so the
/// suite does not flood stderr.
fn quiet_ambient() {
    logging::set_global_sink(Arc::new(MemorySink::new()));
}

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
        Just(Severity::None),
        Just(Severity::Handled),
    ]
}

fn unhandled_severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::High),
        Just(Severity::Medium),
        Just(Severity::Low),
        Just(Severity::None),
    ]
}

fn info_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,12}", "\\PC{0,40}", 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    })
}

// ============================================================================
// CONSTRUCTION PROPERTIES
// ============================================================================

proptest! {
    /// Errors can be constructed from arbitrary strings without panicking.
    #[test]
    fn construction_never_panics(
        code in "\\PC{0,200}",
        message in "\\PC{0,200}",
        name in "\\PC{0,200}",
        severity in severity_strategy(),
    ) {
        let _err = StructuredError::new(
            ErrorProps::new()
                .code(code)
                .message(message)
                .name(name)
                .severity(severity)
                .quiet(),
        ).unwrap();
    }

    /// Non-empty inputs are kept verbatim; empty inputs take the sentinel.
    #[test]
    fn sentinel_substitution_is_exact(code in "\\PC{0,100}", message in "\\PC{0,100}") {
        let err = StructuredError::new(
            ErrorProps::new().code(code.clone()).message(message.clone()).quiet(),
        ).unwrap();

        if code.is_empty() {
            prop_assert_eq!(err.code(), definitions::CODE_MISSING);
        } else {
            prop_assert_eq!(err.code(), code);
        }
        if message.is_empty() {
            prop_assert_eq!(err.message(), definitions::MESSAGE_MISSING);
        } else {
            prop_assert_eq!(err.message(), message);
        }
        // never empty at rest
        prop_assert!(!err.code().is_empty());
        prop_assert!(!err.message().is_empty());
        prop_assert!(!err.name().is_empty());
    }

    /// The info floor is always an empty map, never an absent one.
    #[test]
    fn info_floor_holds(code in "[A-Z_]{1,20}") {
        let err = StructuredError::new(ErrorProps::new().code(code).quiet()).unwrap();
        prop_assert!(err.info().is_empty());
    }
}

// ============================================================================
// LIFECYCLE PROPERTIES
// ============================================================================

proptest! {
    /// handle() returns true exactly once; the second call changes nothing.
    #[test]
    fn handle_is_idempotent(severity in unhandled_severity_strategy(), info in info_strategy()) {
        let sink = MemorySink::new();
        let mut err = StructuredError::new(
            ErrorProps::new()
                .code("PROP")
                .message("m")
                .severity(severity)
                .info(Value::Object(info))
                .quiet(),
        ).unwrap();

        prop_assert!(err.handle_with_sink(None, &sink));
        prop_assert_eq!(err.severity(), Severity::Handled);
        let after_first = err.clone();

        prop_assert!(!err.handle_with_sink(None, &sink));
        prop_assert_eq!(err, after_first);
    }

    /// Additive merging never shrinks info and never changes existing entries.
    #[test]
    fn add_info_is_monotone(base in info_strategy(), extra in info_strategy()) {
        let mut err = StructuredError::new(
            ErrorProps::new().code("PROP").info(Value::Object(base.clone())).quiet(),
        ).unwrap();

        err.add_info(&extra);

        prop_assert!(err.info().len() >= base.len());
        for (key, value) in &base {
            prop_assert_eq!(err.info().get(key), Some(value));
        }
        for (key, value) in &extra {
            if !base.contains_key(key) {
                prop_assert_eq!(err.info().get(key), Some(value));
            }
        }
    }
}

// ============================================================================
// TRANSFORM PROPERTIES
// ============================================================================

proptest! {
    /// The already-structured path only enriches info; identity fields and
    /// stack text stay untouched, and no wrap key appears.
    #[test]
    fn transform_identity_merges_info_only(
        code in "[A-Z_]{1,20}",
        message in "\\PC{1,80}",
        extra in info_strategy(),
    ) {
        let err = StructuredError::new(
            ErrorProps::new().code(code).message(message).quiet(),
        ).unwrap();
        let original = err.clone();

        let transformed = StructuredError::transform(
            err,
            ErrorDefaults::new("T").message("override ignored").info(extra.clone()),
        );

        prop_assert_eq!(transformed.code(), original.code());
        prop_assert_eq!(transformed.message(), original.message());
        prop_assert_eq!(transformed.name(), original.name());
        prop_assert_eq!(transformed.stack(), original.stack());
        if !extra.contains_key(definitions::ORIGINAL_ERROR_KEY) {
            prop_assert!(!transformed.info().contains_key(definitions::ORIGINAL_ERROR_KEY));
        }
    }

    /// Wrapping a string preserves it verbatim as provenance.
    #[test]
    fn transform_preserves_string_provenance(raw in "\\PC{0,200}") {
        let err = StructuredError::transform(
            raw.as_str(),
            ErrorDefaults::new("T").message("y").severity(Severity::None),
        );
        prop_assert_eq!(
            err.info()[definitions::ORIGINAL_ERROR_KEY].as_str(),
            Some(raw.as_str())
        );
    }

    /// Wrapping an io::Error preserves its message as provenance.
    #[test]
    fn transform_preserves_native_provenance(detail in "\\PC{1,120}") {
        let io_err = std::io::Error::other(detail.clone());
        let err = StructuredError::transform(
            io_err,
            ErrorDefaults::new("T").severity(Severity::None),
        );
        prop_assert_eq!(
            err.info()[definitions::ORIGINAL_ERROR_KEY]["message"].as_str(),
            Some(detail.as_str())
        );
    }
}

// ============================================================================
// ROUND-TRIP PROPERTIES
// ============================================================================

proptest! {
    /// revive(serialize(e)) equals e on every field, stack text included.
    #[test]
    fn round_trip_preserves_all_fields(
        code in "[A-Z_]{1,20}",
        message in "\\PC{1,80}",
        severity in severity_strategy(),
        info in info_strategy(),
    ) {
        quiet_ambient();
        let err = StructuredError::new(
            ErrorProps::new()
                .code(code)
                .message(message)
                .severity(severity)
                .info(Value::Object(info))
                .quiet(),
        ).unwrap();

        let revived = StructuredError::from_json_str(&err.to_json_string()).unwrap();
        prop_assert_eq!(&revived, &err);
        prop_assert_eq!(revived.stack(), err.stack());
    }

    /// A second round trip is a fixed point.
    #[test]
    fn double_round_trip_is_fixed_point(code in "[A-Z_]{1,20}", message in "\\PC{1,80}") {
        let err = StructuredError::new(
            ErrorProps::new().code(code).message(message).severity(Severity::None).quiet(),
        ).unwrap();

        let once = StructuredError::from_json_str(&err.to_json_string()).unwrap();
        let twice = StructuredError::from_json_str(&once.to_json_string()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// A tagged envelope nested under arbitrary keys revives while its
    /// siblings pass through unchanged.
    #[test]
    fn nested_revival_is_positional(key in "[a-z]{1,10}", sibling in "\\PC{0,40}") {
        prop_assume!(key != "err");
        quiet_ambient();
        let err = StructuredError::new(
            ErrorProps::new().code("NESTED").message("m").severity(Severity::None).quiet(),
        ).unwrap();

        let mut members = Map::new();
        members.insert("err".to_string(), serde_json::to_value(&err).unwrap());
        members.insert(key.clone(), Value::String(sibling.clone()));
        let doc = Value::Object(members).to_string();

        let revived = StructuredError::parse(&doc).unwrap();
        prop_assert!(revived.get("err").is_some_and(Revived::is_error));
        prop_assert_eq!(
            revived.get(&key).and_then(Revived::as_value),
            Some(&Value::String(sibling))
        );
    }
}

// ============================================================================
// PRESENTATION PROPERTIES
// ============================================================================

proptest! {
    /// render() never panics and always yields the header and message.
    #[test]
    fn render_never_panics(
        code in "\\PC{1,60}",
        message in "\\PC{1,60}",
        stack in "\\PC{0,200}",
    ) {
        let err = StructuredError::new(
            ErrorProps::new().code(code.clone()).message(message).stack(stack).quiet(),
        ).unwrap();

        let block = err.render();
        prop_assert!(std::str::from_utf8(block.as_bytes()).is_ok());
        prop_assert!(block.contains(&code));
    }

    /// Display output stays on a single line for any inputs.
    #[test]
    fn display_is_single_line(code in "[A-Z_]{1,20}", message in "[a-z ]{0,60}") {
        let err = StructuredError::new(
            ErrorProps::new().code(code).message(message).quiet(),
        ).unwrap();
        prop_assert!(!err.to_string().contains('\n'));
    }
}

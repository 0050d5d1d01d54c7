//! Serialization round trip: tagged envelopes and nested revival.
//!
//! Run with: cargo run --example serialization_roundtrip

use serde_json::json;
use strata_errors::{ErrorProps, Revived, Severity, StructuredError};

fn main() {
    let err = StructuredError::new(
        ErrorProps::new()
            .code("SYNC_STALLED")
            .message("replica lag exceeded budget")
            .severity(Severity::None)
            .info(json!({ "replica": "eu-1", "lagMs": 9000 })),
    )
    .expect("info is an object");

    // Serialize: the record carries the discriminator tag.
    let text = err.to_json_string();
    println!("wire form:\n{text}\n");

    // Root-level revival.
    let revived = StructuredError::from_json_str(&text).expect("tagged envelope");
    assert_eq!(revived, err);
    println!("revived equals original: true");

    // Nested revival: the envelope is found inside a larger document while
    // sibling values pass through untouched.
    let doc = json!({
        "ok": false,
        "attempts": [1, 2, 3],
        "failure": serde_json::to_value(&err).expect("serializable"),
    })
    .to_string();

    let parsed = StructuredError::parse(&doc).expect("well-formed document");
    let failure = parsed
        .get("failure")
        .and_then(Revived::as_error)
        .expect("nested envelope revived");
    println!("nested failure code: {}", failure.code());
    println!(
        "sibling untouched: {:?}",
        parsed.get("ok").and_then(Revived::as_value)
    );

    // Malformed input is itself normalized into a structured error.
    let parse_failure = StructuredError::parse_lenient("{not json");
    if let Some(parse_err) = parse_failure.as_error() {
        println!("\nparse failure normalized:\n{}", parse_err.render());
    }
}

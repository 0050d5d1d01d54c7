//! Basic usage: construction, normalization, and the handling lifecycle.
//!
//! Run with: cargo run --example basic_usage

use serde_json::json;
use std::io;
use strata_errors::{ErrorDefaults, ErrorProps, Severity, StructuredError};

fn main() {
    // Direct construction. High severity logs on the warn channel (stderr)
    // as soon as the error exists.
    let fresh = StructuredError::new(
        ErrorProps::new()
            .code("NEW_ERROR")
            .message("this is a new structured error")
            .severity(Severity::High),
    )
    .expect("info is an object");
    println!("constructed: {fresh}");

    // Normalizing an already-structured error is a pass-through: the same
    // value comes back, enriched with the defaults' info only.
    let mut site = serde_json::Map::new();
    site.insert("site".to_string(), json!("ingest"));
    let same = StructuredError::transform(
        fresh,
        ErrorDefaults::new("TRANSFORMED_ERROR")
            .message("this message is ignored on the identity path")
            .info(site),
    );
    println!("identity path kept code: {}", same.code());

    // Normalizing a native error wraps it, keeping the original verbatim
    // under info.originalError.
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "cannot open state file");
    let mut wrapped = StructuredError::transform(
        io_err,
        ErrorDefaults::new("STATE_READ_FAILED").severity(Severity::Medium),
    );
    println!(
        "wrapped original: {}",
        wrapped.info()["originalError"]["message"]
    );

    // Normalizing a bare string works the same way.
    let from_string = StructuredError::transform(
        "a string failure",
        ErrorDefaults::new("STRING_ERROR")
            .message("this is a transformed string error")
            .severity(Severity::Low),
    );
    println!("string provenance: {}", from_string.info()["originalError"]);

    // Handling is terminal: the first call wins, the second is a no-op.
    assert!(wrapped.handle(Some(json!({ "resolvedBy": "operator" }))));
    assert!(!wrapped.handle(None));
    println!("handled: {}", wrapped.is_handled());
}

// benches/error_performance.rs
//! Benchmarks for the construction, normalization, and codec paths.
//!
//! Construction captures a backtrace, so it dominates; the quiet variants
//! isolate the logging overhead from the capture cost.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::io;
use strata_errors::{ErrorDefaults, ErrorProps, Severity, StructuredError};

fn bench_construction(c: &mut Criterion) {
    c.bench_function("construct_quiet", |b| {
        b.iter(|| {
            StructuredError::new(
                ErrorProps::new()
                    .code(black_box("BENCH_ERROR"))
                    .message("benchmark construction")
                    .severity(Severity::None)
                    .quiet(),
            )
        })
    });

    c.bench_function("construct_with_supplied_stack", |b| {
        b.iter(|| {
            StructuredError::new(
                ErrorProps::new()
                    .code(black_box("BENCH_ERROR"))
                    .message("benchmark construction")
                    .severity(Severity::None)
                    .stack("header\nframe one\nframe two")
                    .quiet(),
            )
        })
    });
}

fn bench_transform(c: &mut Criterion) {
    c.bench_function("transform_native_error", |b| {
        b.iter(|| {
            let io_err = io::Error::new(io::ErrorKind::NotFound, black_box("missing"));
            StructuredError::transform(
                io_err,
                ErrorDefaults::new("BENCH_TRANSFORM").severity(Severity::None),
            )
        })
    });

    c.bench_function("transform_identity", |b| {
        let err = StructuredError::new(
            ErrorProps::new()
                .code("BENCH_IDENTITY")
                .message("already structured")
                .severity(Severity::None)
                .quiet(),
        )
        .unwrap();
        b.iter(|| {
            StructuredError::transform(
                black_box(err.clone()),
                ErrorDefaults::new("BENCH_TRANSFORM"),
            )
        })
    });
}

fn bench_codec(c: &mut Criterion) {
    let err = StructuredError::new(
        ErrorProps::new()
            .code("BENCH_CODEC")
            .message("round trip")
            .severity(Severity::None)
            .info(json!({ "replica": "eu-1", "lagMs": 9000 }))
            .stack("header\nframe one\nframe two")
            .quiet(),
    )
    .unwrap();
    let text = err.to_json_string();

    c.bench_function("serialize", |b| b.iter(|| black_box(&err).to_json_string()));

    c.bench_function("revive", |b| {
        b.iter(|| StructuredError::from_json_str(black_box(&text)))
    });

    c.bench_function("render", |b| b.iter(|| black_box(&err).render()));
}

criterion_group!(benches, bench_construction, bench_transform, bench_codec);
criterion_main!(benches);

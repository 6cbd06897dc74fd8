//! # Result Store Benchmarks
//!
//! Cost of the whole-document rewrite as the result file grows.
//!
//! Run with: `cargo bench -p uwh-core`

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::TempDir;
use uwh_core::{
    GameId, ResultDocument, ResultRecord, ResultSink, ResultStore, document_from_bytes,
    document_to_bytes,
};

fn record(n: u32) -> ResultRecord {
    ResultRecord {
        white_team: format!("WHITE {}", n),
        black_team: format!("BLACK {}", n),
        white_score: n % 7,
        black_score: n % 5,
        start_time: "10:00:00".to_string(),
    }
}

/// A document holding `size` games.
fn document(size: u32) -> ResultDocument {
    let mut doc = ResultDocument::new();
    for n in 0..size {
        doc.insert(&GameId(n).key(), record(n));
    }
    doc
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_encode");

    for size in [10u32, 100, 1000].iter() {
        let doc = document(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(document_to_bytes(doc).expect("encode")));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_decode");

    for size in [10u32, 100, 1000].iter() {
        let bytes = document_to_bytes(&document(*size)).expect("encode");
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| black_box(document_from_bytes(bytes).expect("decode")));
        });
    }

    group.finish();
}

fn bench_store_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_save");

    for size in [10u32, 100, 1000].iter() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("results.json");
        let seed = document_to_bytes(&document(*size)).expect("encode");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut store = ResultStore::open(&path);
            b.iter_batched(
                || std::fs::write(&path, &seed).expect("seed"),
                |()| black_box(store.save(GameId(size), &record(size)).expect("save")),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_store_save);
criterion_main!(benches);

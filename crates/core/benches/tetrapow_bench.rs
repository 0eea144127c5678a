//! Benchmark for the Tetra-PoW pipeline

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tetrapow_core::{CANONICAL_AXIOM, CandidateEvaluator, Hardening, TetraPow, bind, harden};

/// Reduced so a sample finishes in reasonable time; scale linearly for the
/// protocol cost.
const BENCH_ITERATIONS: u32 = 1_000;

fn bench_candidate(c: &mut Criterion) {
    let seed = bind(CANONICAL_AXIOM).unwrap();
    let pow = TetraPow::new(seed, Hardening::new(BENCH_ITERATIONS).unwrap());

    c.bench_function("tetrapow_candidate", |b| {
        let mut nonce: u64 = 0;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            pow.digest(black_box(nonce), black_box(1_700_000_000))
        })
    });
}

fn bench_harden(c: &mut Criterion) {
    c.bench_function("tetrapow_harden", |b| {
        b.iter(|| harden(black_box(b"input"), black_box(b"salt"), BENCH_ITERATIONS, 32))
    });
}

criterion_group!(benches, bench_candidate, bench_harden);
criterion_main!(benches);

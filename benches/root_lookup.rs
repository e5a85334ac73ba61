use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::time::Duration;

use rootrelay::root_history::RootHistory;
use rootrelay::types::Root;

const N: usize = 100_000;
const WINDOW: u64 = 7 * 24 * 3600;

// deterministic roots
fn gen_roots(n: usize) -> Vec<Root> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        bytes[0] |= 1;
        out.push(Root(bytes));
    }
    out
}

fn build_history(roots: &[Root]) -> RootHistory {
    let mut history = RootHistory::new(WINDOW);
    for (i, root) in roots.iter().enumerate() {
        // 12s apart, so only the tail is still inside the window
        let _ = history.accept_root(*root, i as u64 * 12);
    }
    history
}

fn bench_root_lookup(c: &mut Criterion) {
    let roots = gen_roots(N);
    let history = build_history(&roots);
    let now = N as u64 * 12;

    let mut group = c.benchmark_group("root_lookup");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function(BenchmarkId::new("is_valid_root_head", N), |b| {
        let head = roots[N - 1];
        b.iter(|| black_box(history.is_valid_root(black_box(&head), now)))
    });

    group.bench_function(BenchmarkId::new("is_valid_root_expired", N), |b| {
        let oldest = roots[0];
        b.iter(|| black_box(history.is_valid_root(black_box(&oldest), now)))
    });

    group.bench_function(BenchmarkId::new("is_valid_root_unknown", N), |b| {
        let unknown = Root::from(7);
        b.iter(|| black_box(history.is_valid_root(black_box(&unknown), now)))
    });

    group.finish();
}

fn bench_accept(c: &mut Criterion) {
    let roots = gen_roots(N);
    let history = build_history(&roots[..N - 1]);

    let mut group = c.benchmark_group("accept_root");
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("accept_into_history", N - 1), |b| {
        b.iter_batched(
            || history.clone(),
            |mut h| black_box(h.accept_root(roots[N - 1], N as u64 * 12)),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_root_lookup, bench_accept);
criterion_main!(benches);

//! Masked view iteration benchmarks.
//!
//! Compares walking a masked view against materializing the selected
//! identifiers into a fresh vector on every trial:
//! - Different selection densities (1%, 10%, 50%, 90%)
//! - Selected and complement polarity
//! - Per-trial mask refresh through the subset sampler

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use masked_ids::{MaskedView, PositionMask, SubsetConfig, SubsetSampler};

const N: usize = 100_000;

fn sampled_mask(rate: f64, seed: u64) -> PositionMask {
    let config = SubsetConfig::builder().rate(rate).seed(seed).build().unwrap();
    let mut mask = PositionMask::new();
    SubsetSampler::new(config)
        .unwrap()
        .sample_into(&mut mask, N);
    mask
}

// =============================================================================
// Density Benchmarks
// =============================================================================

fn bench_view_vs_materialize(c: &mut Criterion) {
    let ids: Vec<u64> = (0..N as u64).map(|i| i * 31).collect();

    let mut group = c.benchmark_group("masked/density");
    group.throughput(Throughput::Elements(N as u64));

    for rate in [0.01f64, 0.1, 0.5, 0.9] {
        let mask = sampled_mask(rate, 42);

        group.bench_with_input(BenchmarkId::new("view_selected", rate), &mask, |b, mask| {
            b.iter(|| {
                let view = MaskedView::selected(&ids, mask);
                black_box(view.iter().fold(0u64, |acc, id| acc.wrapping_add(id)))
            });
        });

        group.bench_with_input(BenchmarkId::new("view_complement", rate), &mask, |b, mask| {
            b.iter(|| {
                let view = MaskedView::complement(&ids, mask);
                black_box(view.iter().fold(0u64, |acc, id| acc.wrapping_add(id)))
            });
        });

        group.bench_with_input(BenchmarkId::new("materialized", rate), &mask, |b, mask| {
            b.iter(|| {
                let subset: Vec<u64> = mask.ones().map(|p| ids[p]).collect();
                black_box(subset.iter().fold(0u64, |acc, &id| acc.wrapping_add(id)))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Trial Loop Benchmarks
// =============================================================================

fn bench_trial_loop(c: &mut Criterion) {
    let ids: Vec<u64> = (0..N as u64).collect();
    let config = SubsetConfig::builder().rate(0.1).build().unwrap();

    c.bench_function("masked/trial_loop", |b| {
        let mut sampler = SubsetSampler::new(config.clone()).unwrap();
        let mut mask = PositionMask::with_len(N);
        b.iter(|| {
            sampler.sample_into(&mut mask, N);
            let view = MaskedView::selected(&ids, &mask);
            black_box(view.len())
        });
    });
}

criterion_group!(benches, bench_view_vs_materialize, bench_trial_loop);
criterion_main!(benches);

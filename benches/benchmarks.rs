//! Benchmarks for topflow engines
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use topflow::config::EngineConfig;
use topflow::frequency::{ExactTopK, FilteredSpaceSaving, SpaceSaving};
use topflow::heap::IndexedMinHeap;
use topflow::pipeline;
use topflow::traits::FrequencyEngine;

const STREAM_LEN: usize = 100_000;
const ALPHABET: usize = 10_000;

/// Zipf-like stream: rank r is drawn with weight 1/r
fn zipf_stream(len: usize, alphabet: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights: Vec<f64> = (1..=alphabet).map(|r| 1.0 / r as f64).collect();
    let total: f64 = weights.iter().sum();
    let mut cumulative = Vec::with_capacity(alphabet);
    let mut acc = 0.0;
    for w in &weights {
        acc += w / total;
        cumulative.push(acc);
    }

    (0..len)
        .map(|_| {
            let p: f64 = rng.gen();
            let rank = cumulative.partition_point(|&c| c < p).min(alphabet - 1);
            format!("item-{}", rank).into_bytes()
        })
        .collect()
}

// ============================================================================
// Indexed Min-Heap Benchmarks
// ============================================================================

fn bench_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_pop", |b| {
        let mut heap = IndexedMinHeap::with_capacity(1024);
        for i in 0..1024u64 {
            heap.push(i.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        }
        let mut i = 0u64;
        b.iter(|| {
            heap.push(black_box(i.wrapping_mul(0x9E37_79B9_7F4A_7C15)));
            black_box(heap.pop_min());
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("increment_min", |b| {
        let mut heap = IndexedMinHeap::with_capacity(1024);
        for i in 0..1024u64 {
            heap.push(i);
        }
        b.iter(|| {
            if let Some(id) = heap.peek_min_id() {
                heap.update(id, |count| *count += 1);
            }
        });
    });

    group.finish();
}

// ============================================================================
// Engine Benchmarks
// ============================================================================

fn bench_engines(c: &mut Criterion) {
    let stream = zipf_stream(STREAM_LEN, ALPHABET, 42);

    let mut group = c.benchmark_group("engines");
    group.throughput(Throughput::Elements(STREAM_LEN as u64));
    group.sample_size(20);

    group.bench_function("exact", |b| {
        b.iter_batched(
            || ExactTopK::new(10),
            |mut engine| {
                engine.extend(&stream);
                black_box(engine.top_k())
            },
            BatchSize::LargeInput,
        );
    });

    for capacity in [50, 500] {
        group.bench_function(format!("space_saving_c{}", capacity), |b| {
            b.iter_batched(
                || SpaceSaving::new(10, capacity),
                |mut engine| {
                    engine.extend(&stream);
                    black_box(engine.top_k())
                },
                BatchSize::LargeInput,
            );
        });
    }

    for bits in [8u8, 16] {
        group.bench_function(format!("filtered_b{}", bits), |b| {
            b.iter_batched(
                || FilteredSpaceSaving::new(10, 50, bits, 0),
                |mut engine| {
                    engine.extend(&stream);
                    black_box(engine.top_k())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut input = Vec::new();
    for record in zipf_stream(STREAM_LEN, ALPHABET, 7) {
        input.extend_from_slice(&record);
        input.push(b'\n');
    }

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.sample_size(20);

    group.bench_function("exact_run", |b| {
        let config = EngineConfig::new(10);
        b.iter(|| black_box(pipeline::run(&input[..], &config)));
    });

    group.bench_function("filtered_run", |b| {
        let config = EngineConfig::new(10).with_algorithm(topflow::Algorithm::Filtered);
        b.iter(|| black_box(pipeline::run(&input[..], &config)));
    });

    group.finish();
}

criterion_group!(benches, bench_heap, bench_engines, bench_pipeline);

criterion_main!(benches);

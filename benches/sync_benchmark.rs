/*!
 * Keyed Synchronization Benchmarks
 *
 * Registry acquire/release cost by shard count, per-key execution under
 * contention, and buffer insert/drain throughput
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keyed_sync::{ConcurrentDrainableBuffer, PerKeyExecutor, RegistryConfig, ShardedKeyedRegistry};
use std::sync::Arc;
use std::thread;

fn bench_registry_acquire_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_acquire_release");

    for shards in [1usize, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &shards, |b, &shards| {
            let registry = ShardedKeyedRegistry::with_shard_count(shards, || 0u64);
            let mut key = 0u64;
            b.iter(|| {
                key = key.wrapping_add(1) % 1024;
                let resource = registry.acquire(black_box(&key));
                black_box(&resource);
                registry.release(&key).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_contended_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_keys");
    const THREADS: usize = 4;
    const OPS_PER_THREAD: u64 = 1_000;
    group.throughput(Throughput::Elements(THREADS as u64 * OPS_PER_THREAD));

    for keys in [1u64, 16, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            let executor = Arc::new(
                PerKeyExecutor::<u64>::with_config(RegistryConfig::default()).unwrap(),
            );
            b.iter(|| {
                let handles: Vec<_> = (0..THREADS as u64)
                    .map(|t| {
                        let executor = Arc::clone(&executor);
                        thread::spawn(move || {
                            for i in 0..OPS_PER_THREAD {
                                executor.execute(&((i + t) % keys), || black_box(i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_uncontended_execute(c: &mut Criterion) {
    let executor = PerKeyExecutor::new();
    c.bench_function("uncontended_execute", |b| {
        b.iter(|| executor.execute(black_box(&"key"), || black_box(1)))
    });
}

fn bench_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer");

    for batch in [16usize, 256, 4096] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("add_then_drain_all", batch), &batch, |b, &batch| {
            let buffer = ConcurrentDrainableBuffer::new();
            b.iter(|| {
                buffer.add_all(0..batch);
                black_box(buffer.drain_all());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_registry_acquire_release,
    bench_contended_keys,
    bench_uncontended_execute,
    bench_buffer
);
criterion_main!(benches);

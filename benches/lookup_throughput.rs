//! Lookup, add, and remove throughput.
//!
//! Run with: cargo bench --bench lookup_throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashring::ConsistentEngine;

fn pregenerate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i:08}")).collect()
}

fn populated_engine(node_count: usize) -> ConsistentEngine {
    let engine = ConsistentEngine::new();
    for i in 0..node_count {
        engine.add_node(&format!("node-{i}")).unwrap();
    }
    engine
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for &node_count in &[10usize, 50, 200] {
        let engine = populated_engine(node_count);
        let keys = pregenerate_keys(10_000);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &keys,
            |b, keys| {
                b.iter(|| {
                    for k in keys {
                        black_box(engine.lookup(k.as_bytes()).unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology_mutation");
    group.bench_function("add_node", |b| {
        let engine = populated_engine(100);
        let mut next = 100;
        b.iter(|| {
            engine.add_node(&format!("node-{next}")).unwrap();
            next += 1;
        });
    });
    group.bench_function("remove_then_restore", |b| {
        let engine = populated_engine(100);
        b.iter(|| {
            engine.remove_node("node-50").unwrap();
            engine.add_node("node-50").unwrap();
        });
    });
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_add_remove);
criterion_main!(benches);

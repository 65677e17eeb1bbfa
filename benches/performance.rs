//! Performance benchmarks for the profile store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roster::{ProfileDocument, Store, StoreConfig, UserRecord};
use tempfile::TempDir;

fn seeded_store(dir: &TempDir, users: usize) -> Store {
    let store = Store::open(StoreConfig {
        path: dir.path().join("profile.json"),
    })
    .unwrap();

    let mut doc = ProfileDocument::new();
    for i in 0..users {
        let name = format!("player{}", i);
        doc.insert(name.clone(), UserRecord::new(name));
    }
    store.save(&doc).unwrap();

    store
}

/// Benchmark one full event cycle (load, mutate, save) at varying document sizes
fn bench_record_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_event");

    for users in [1, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("users", users), &users, |b, &users| {
            let dir = TempDir::new().unwrap();
            let store = seeded_store(&dir, users);

            b.iter(|| {
                store.won(black_box("player0")).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark document load at varying document sizes
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for users in [1, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("users", users), &users, |b, &users| {
            let dir = TempDir::new().unwrap();
            let store = seeded_store(&dir, users);

            b.iter(|| {
                black_box(store.load());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record_event, bench_load);
criterion_main!(benches);

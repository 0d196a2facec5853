//! Benchmarks for model ingestion
//!
//! Run with: cargo bench --package model

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use model::PreferenceModel;

fn synthetic_pairs(users: u64, items_per_user: u64) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity((users * items_per_user) as usize);
    for user in 1..=users {
        for item in 1..=items_per_user {
            pairs.push((
                format!("rating.vod.bulsat.{},{}", user, item * 7),
                format!("{}", (user + item) % 5 + 1),
            ));
        }
    }
    pairs
}

fn bench_ingest(c: &mut Criterion) {
    let pairs = synthetic_pairs(1_000, 50);

    c.bench_function("ingest_50k_records", |b| {
        b.iter(|| {
            let (model, skipped) = PreferenceModel::ingest(black_box(pairs.clone()));
            black_box((model, skipped))
        })
    });
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);

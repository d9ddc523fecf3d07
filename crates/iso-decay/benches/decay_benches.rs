//! Criterion benchmarks for iso-decay.
//!
//! Covers: content-key hashing, cache hits, and cold solves.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use iso_core::{Basis, Composition};
use iso_decay::{CompositionKey, DecayChainCache, HalfLifeSolver, HalfLifeTable};

fn spent_fuel() -> Arc<Composition> {
    Arc::new(
        Composition::from_raw(
            [
                (92235, 0.008),
                (92238, 0.94),
                (94239, 0.006),
                (94241, 0.001),
                (55137, 0.0015),
                (38090, 0.0008),
            ],
            Basis::Mass,
        )
        .unwrap(),
    )
}

fn solver() -> Arc<HalfLifeSolver> {
    let table = HalfLifeTable::from_json_str(
        r#"{ "half_lives": [
            { "id": 94241, "half_life": 173.0, "daughter": 95241 },
            { "id": 55137, "half_life": 361.0, "daughter": 56137 },
            { "id": 38090, "half_life": 346.0, "daughter": 40090 }
        ] }"#,
    )
    .unwrap();
    Arc::new(HalfLifeSolver::new(&table).unwrap())
}

fn bench_key(c: &mut Criterion) {
    let fuel = spent_fuel();
    c.bench_function("composition_key", |b| b.iter(|| CompositionKey::of(black_box(&fuel))));
}

fn bench_cache_hit(c: &mut Criterion) {
    let cache = DecayChainCache::new(solver());
    let fuel = spent_fuel();
    cache.get_or_compute_daughter(&fuel, 12).unwrap();

    c.bench_function("decay_cache_hit", |b| {
        b.iter(|| cache.get_or_compute_daughter(black_box(&fuel), black_box(12)))
    });
}

fn bench_cache_miss(c: &mut Criterion) {
    let fuel = spent_fuel();
    let solver = solver();

    c.bench_function("decay_cache_miss", |b| {
        b.iter(|| {
            let cache = DecayChainCache::new(solver.clone());
            cache.get_or_compute_daughter(black_box(&fuel), black_box(12))
        })
    });
}

criterion_group!(benches, bench_key, bench_cache_hit, bench_cache_miss);
criterion_main!(benches);

//! Fusion hot-path benchmark: 10k candidates, two vector rankings.

use std::collections::{BTreeSet, HashMap};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use parcela_core::parcel::ParcelId;
use parcela_retrieval::fusion::{fuse, FusionInputs};

fn bench_fuse(c: &mut Criterion) {
    let graph: BTreeSet<ParcelId> = (0..10_000).map(ParcelId).collect();
    let proximity: HashMap<ParcelId, f64> = graph
        .iter()
        .map(|id| (*id, (id.0 % 100) as f64 / 100.0))
        .collect();
    let semantic: Vec<(ParcelId, f64)> = (0..500)
        .map(|i| (ParcelId(i * 7 % 10_000), 1.0 - i as f64 / 500.0))
        .collect();
    let structural: Vec<(ParcelId, f64)> = (0..500)
        .map(|i| (ParcelId(i * 13 % 10_000), 1.0 - i as f64 / 500.0))
        .collect();

    c.bench_function("fuse_10k_candidates", |b| {
        b.iter(|| {
            let inputs = FusionInputs {
                graph: Some(black_box(&graph)),
                proximity: black_box(&proximity),
                semantic: Some(black_box(&semantic)),
                structural: Some(black_box(&structural)),
            };
            fuse(&inputs, 60)
        })
    });
}

criterion_group!(benches, bench_fuse);
criterion_main!(benches);

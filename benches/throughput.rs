use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use parkflow::core::store::ParkingStore;

fn store(capacity: usize) -> ParkingStore {
    ParkingStore::new(NonZeroUsize::new(capacity).expect("capacity"))
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("check_in_out_churn_10k", |b| {
        b.iter(|| {
            let mut lot = store(128);
            for i in 0..10_000u64 {
                let _ = lot
                    .check_in_at(&format!("B{i}X"), "Matic", i)
                    .expect("check in");
                if i >= 128 {
                    let _ = lot
                        .check_out_at((i % 128) as usize, i + 1)
                        .expect("check out");
                }
            }
        });
    });
}

fn bench_undo_storm(c: &mut Criterion) {
    c.bench_function("undo_drain_10k", |b| {
        b.iter(|| {
            let mut lot = store(64);
            for i in 0..10_000u64 {
                let _ = lot.check_in_at(&format!("W{i}X"), "Bebek", i);
            }
            while lot.undo().is_ok() {}
        });
    });
}

fn bench_snapshot_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_export");

    for sessions in [100usize, 1000, 10_000] {
        let mut lot = store(32);
        for i in 0..sessions as u64 {
            let _ = lot
                .check_in_at(&format!("N{i}X"), "Sport", i)
                .expect("check in");
            let _ = lot.check_out_at(0, i + 1).expect("check out");
        }

        group.bench_with_input(BenchmarkId::from_parameter(sessions), &sessions, |b, _| {
            b.iter(|| {
                let _ = lot.export_snapshot();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_churn, bench_undo_storm, bench_snapshot_export);
criterion_main!(benches);

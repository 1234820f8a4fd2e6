//! Benchmarks for the grouping scan.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quiver_exec::agg;
use quiver_exec::group_by::{key, GroupByOp};
use quiver_exec::{Collection, Context, NullGraph, T0, T1};

fn input(rows: usize, keys: u64) -> Context<Collection<i64>, (Collection<u64>,)> {
    let key_col: Vec<u64> = (0..rows as u64).map(|i| i % keys).collect();
    let values: Vec<i64> = (0..rows as i64).collect();
    Context::new(Collection::new(key_col)).push(Collection::new(values))
}

fn bench_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");

    for &keys in &[16u64, 1024] {
        group.bench_function(format!("count/100k_rows/{keys}_keys"), |b| {
            b.iter(|| {
                let ctx = input(100_000, keys);
                let out =
                    GroupByOp::group_by(&NullGraph, ctx, key::<T0>(), (agg::count::<T0>(),))
                        .unwrap();
                black_box(out.len())
            });
        });

        group.bench_function(format!("count_to_list/100k_rows/{keys}_keys"), |b| {
            b.iter(|| {
                let ctx = input(100_000, keys);
                let out = GroupByOp::group_by(
                    &NullGraph,
                    ctx,
                    key::<T0>(),
                    (agg::count::<T0>(), agg::to_list::<T1>()),
                )
                .unwrap();
                black_box(out.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_group_by);
criterion_main!(benches);

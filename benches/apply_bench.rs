//! Element-wise apply throughput across the dispatch paths.
//!
//! Sizes: 1K, 16K, 256K elements.
//! Paths: dense buffer, column-major matrix, row broadcast, generic strided walk.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use minops::{FnOp, MatrixV, NdArrayV, Op2, Vec64};

const SIZES: &[usize] = &[1024, 16384, 262144];
const COLS: usize = 64;

fn filled(n: usize) -> Vec64<f64> {
    (0..n).map(|i| (i % 97) as f64 * 0.5).collect()
}

fn bench_dense(c: &mut Criterion) {
    let add = FnOp::named("add", |a, b| a + b);
    let mut group = c.benchmark_group("apply_dense");
    for &n in SIZES {
        let source = filled(n);
        let mut target = filled(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| add.apply_to(&mut target, black_box(&source)).unwrap())
        });
    }
    group.finish();
}

fn bench_matrix(c: &mut Criterion) {
    let mul = FnOp::named("mul", |a, b| a * b);
    let mut group = c.benchmark_group("apply_matrix");
    for &n in SIZES {
        let rows = n / COLS;
        let mut a = filled(n);
        let mut b = filled(n);
        let row = filled(COLS);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("col_major", n), &n, |bench, _| {
            let src = MatrixV::new(&mut b, rows, COLS).unwrap();
            let mut m = MatrixV::new(&mut a, rows, COLS).unwrap();
            bench.iter(|| mul.apply_to(&mut m, black_box(&src)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("row_broadcast", n), &n, |bench, _| {
            let mut m = MatrixV::new(&mut a, rows, COLS).unwrap();
            bench.iter(|| mul.apply_to(&mut m, black_box(&row)).unwrap())
        });
    }
    group.finish();
}

fn bench_strided(c: &mut Criterion) {
    let max = FnOp::named("max", f64::max);
    let mut group = c.benchmark_group("apply_strided");
    for &n in SIZES {
        let mut data = filled(n);
        let row = filled(4);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            let mut v = NdArrayV::new(&mut data, &[4, COLS, n / (4 * COLS)]).unwrap();
            let mut t = v.transposed();
            bench.iter(|| max.apply_to(&mut t, black_box(&row)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dense, bench_matrix, bench_strided);
criterion_main!(benches);

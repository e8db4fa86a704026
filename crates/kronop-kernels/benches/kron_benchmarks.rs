//! Performance benchmarks for kronop-kernels
//!
//! Run with: cargo bench -p kronop-kernels
//!
//! Benchmarks cover:
//! - Explicit Kronecker product (serial & parallel)
//! - Two-factor matvec: structured vs build-then-multiply
//! - Two-factor matvec: serial vs output-block parallel
//! - Three-factor matvec (forward & transposed)
//! - Diagonal matvec

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scirs2_core::ndarray_ext::{Array1, Array2};
use kronop_kernels::*;

fn bench_kronecker(c: &mut Criterion) {
    let mut group = c.benchmark_group("kronecker");

    for &size in [5, 10, 20, 30].iter() {
        let a = Array2::<f64>::from_shape_fn((size, size), |(i, j)| (i + j) as f64);
        let b = Array2::<f64>::from_shape_fn((size, size), |(i, j)| (i * j + 1) as f64);

        let ops = size * size * size * size; // one multiply per element
        group.throughput(Throughput::Elements(ops as u64));

        group.bench_with_input(
            BenchmarkId::new("serial", format!("{}x{}", size, size)),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    black_box(kronecker(&a.view(), &b.view()));
                });
            },
        );

        #[cfg(feature = "parallel")]
        group.bench_with_input(
            BenchmarkId::new("parallel", format!("{}x{}", size, size)),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    black_box(kronecker_parallel(&a.view(), &b.view()));
                });
            },
        );
    }
    group.finish();
}

fn bench_structured_vs_explicit(c: &mut Criterion) {
    let mut group = c.benchmark_group("kron_matvec_vs_explicit");

    for &size in [8, 16, 32].iter() {
        let a = random_matrix::<f64>(size, size, -1.0, 1.0);
        let b = random_matrix::<f64>(size, size, -1.0, 1.0);
        let f = random_vector::<f64>(size * size, -1.0, 1.0);
        let mut g = Array1::<f64>::zeros(size * size);

        group.bench_with_input(
            BenchmarkId::new("structured", format!("{}x{}", size, size)),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    kron_matvec(&a.view(), &b.view(), &f.view(), &mut g.view_mut(), MatvecMode::Forward)
                        .unwrap();
                    black_box(&g);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("build_then_multiply", format!("{}x{}", size, size)),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let k = kronecker(&a.view(), &b.view());
                    black_box(k.dot(&f));
                });
            },
        );
    }
    group.finish();
}

fn bench_kron_matvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("kron_matvec");

    for &size in [32, 64, 128, 256].iter() {
        let a = random_matrix::<f64>(size, size, -1.0, 1.0);
        let b = random_matrix::<f64>(size, size, -1.0, 1.0);
        let f = random_vector::<f64>(size * size, -1.0, 1.0);
        let op = KronOperator::dense(a.view(), b.view());

        group.throughput(Throughput::Elements(
            op.work_estimate(MatvecMode::Forward) as u64,
        ));

        for mode in [MatvecMode::Forward, MatvecMode::Transposed] {
            let mut g = Array1::<f64>::zeros(op.output_len(mode));
            group.bench_with_input(
                BenchmarkId::new(format!("serial_{}", mode), size),
                &size,
                |bencher, _| {
                    bencher.iter(|| {
                        op.apply(&f.view(), &mut g.view_mut(), mode).unwrap();
                        black_box(&g);
                    });
                },
            );

            #[cfg(feature = "parallel")]
            {
                let config = MatvecConfig::parallel();
                group.bench_with_input(
                    BenchmarkId::new(format!("parallel_{}", mode), size),
                    &size,
                    |bencher, _| {
                        bencher.iter(|| {
                            op.apply_with(&f.view(), &mut g.view_mut(), mode, &config)
                                .unwrap();
                            black_box(&g);
                        });
                    },
                );
            }
        }
    }
    group.finish();
}

fn bench_kron3_matvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("kron3_matvec");

    for &size in [8, 16, 32].iter() {
        let a = random_matrix::<f64>(size, size, -1.0, 1.0);
        let b = random_matrix::<f64>(size, size + 2, -1.0, 1.0);
        let cm = random_matrix::<f64>(size + 1, size, -1.0, 1.0);
        let op = KronOperator::dense3(a.view(), b.view(), cm.view());

        for mode in [MatvecMode::Forward, MatvecMode::Transposed] {
            let f = random_vector::<f64>(op.input_len(mode), -1.0, 1.0);
            let mut g = Array1::<f64>::zeros(op.output_len(mode));
            group.throughput(Throughput::Elements(op.work_estimate(mode) as u64));
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), format!("{}^3", size)),
                &size,
                |bencher, _| {
                    bencher.iter(|| {
                        op.apply(&f.view(), &mut g.view_mut(), mode).unwrap();
                        black_box(&g);
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_diagonal(c: &mut Criterion) {
    let mut group = c.benchmark_group("kron_matvec_diag");

    for &size in [100, 500, 1000].iter() {
        let a = random_vector::<f64>(size, 0.5, 2.0);
        let b = random_vector::<f64>(size, 0.5, 2.0);
        let f = random_vector::<f64>(size * size, -1.0, 1.0);
        let mut g = Array1::<f64>::zeros(size * size);

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("serial", size), &size, |bencher, _| {
            bencher.iter(|| {
                kron_matvec_diag(&a.view(), &b.view(), &f.view(), &mut g.view_mut()).unwrap();
                black_box(&g);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_kronecker,
    bench_structured_vs_explicit,
    bench_kron_matvec,
    bench_kron3_matvec,
    bench_diagonal
);
criterion_main!(benches);

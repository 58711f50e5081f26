//! Criterion micro-benchmarks for the kernel families
//!
//! Operands are generated with a fixed seed so successive runs measure
//! the same problem instances.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use matbench::constants::DEFAULT_TILE_SIZE;
use matbench::kernels::{dense, sparse};
use matbench::matrix::DenseMatrix;

fn seeded_dense(rows: usize, cols: usize, sparsity: f32, seed: u64) -> DenseMatrix<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let keep = f64::from(1.0 - sparsity);
    let mut m = DenseMatrix::zeros(rows, cols);

    for cell in m.as_mut_slice() {
        if rng.gen_bool(keep) {
            *cell = rng.gen::<f32>();
        }
    }

    m
}

fn bench_dense_gemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_gemm");

    for &size in &[64usize, 128, 256] {
        let a = seeded_dense(size, size, 0.0, 1);
        let b = seeded_dense(size, size, 0.0, 2);
        let mut out = DenseMatrix::zeros(size, size);

        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |bench, _| {
            bench.iter(|| {
                out.fill_zero();
                dense::gemm_scalar(black_box(&a), black_box(&b), &mut out, false, false);
            });
        });

        group.bench_with_input(BenchmarkId::new("simd", size), &size, |bench, _| {
            bench.iter(|| {
                out.fill_zero();
                dense::gemm_simd(black_box(&a), black_box(&b), &mut out);
            });
        });

        group.bench_with_input(BenchmarkId::new("tiled", size), &size, |bench, _| {
            bench.iter(|| {
                out.fill_zero();
                dense::gemm_tiled(black_box(&a), black_box(&b), &mut out, DEFAULT_TILE_SIZE);
            });
        });

        group.bench_with_input(BenchmarkId::new("optimized", size), &size, |bench, _| {
            bench.iter(|| {
                out.fill_zero();
                dense::gemm_optimized(black_box(&a), black_box(&b), &mut out, DEFAULT_TILE_SIZE);
            });
        });
    }

    group.finish();
}

fn bench_sparse_spmm(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_spmm");
    let size = 256;

    for &sparsity in &[0.5f32, 0.9, 0.99] {
        let a = seeded_dense(size, size, sparsity, 3);
        let b = seeded_dense(size, size, 0.0, 4);
        let a_csr = a.to_csr();
        let a_csc = a.to_csc();
        let mut out = DenseMatrix::zeros(size, size);

        group.bench_with_input(
            BenchmarkId::new("csr_scalar", format!("{}", sparsity)),
            &sparsity,
            |bench, _| {
                bench.iter(|| sparse::csr_spmm_scalar(black_box(&a_csr), black_box(&b), &mut out));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("csr_simd", format!("{}", sparsity)),
            &sparsity,
            |bench, _| {
                bench.iter(|| sparse::csr_spmm_simd(black_box(&a_csr), black_box(&b), &mut out));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("csc_simd", format!("{}", sparsity)),
            &sparsity,
            |bench, _| {
                bench.iter(|| sparse::csc_spmm_simd(black_box(&a_csc), black_box(&b), &mut out));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_dense_gemm, bench_sparse_spmm);
criterion_main!(benches);

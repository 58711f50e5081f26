//! Dense GEMM kernel family
//!
//! Every variant computes `C[i,j] = Σ_k A[i,k] * B[k,j]` in single
//! precision; they differ only in execution strategy. Accumulation order
//! varies between variants, so outputs agree up to floating-point
//! reordering and must be compared with `validate_results`.
//!
//! The performance kernels (everything except the scalar reference)
//! require row-major operands so rows can be processed as contiguous
//! slices; parallel variants partition the output by disjoint row ranges,
//! which keeps every cell single-writer without synchronization.

use rayon::prelude::*;

use crate::kernels::simd;
use crate::matrix::{DenseMatrix, Layout};

fn assert_conformant(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &DenseMatrix<f32>) {
    assert_eq!(a.cols, b.rows, "inner dimensions must agree");
    assert_eq!(c.rows, a.rows, "output rows must match A");
    assert_eq!(c.cols, b.cols, "output cols must match B");
}

fn assert_row_major(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &DenseMatrix<f32>) {
    assert!(
        a.layout == Layout::RowMajor && b.layout == Layout::RowMajor && c.layout == Layout::RowMajor,
        "performance kernels require row-major operands"
    );
}

/// Scalar reference: triple nested loop with one accumulator per cell
///
/// `transpose_a` / `transpose_b` index the operand transposed without
/// materializing a transpose: `A(k, i)` instead of `A(i, k)`, and
/// `B(j, k)` instead of `B(k, j)`. Dimensions are checked against the
/// output shape, so `A` must be `k × m` when transposed.
pub fn gemm_scalar(
    a: &DenseMatrix<f32>,
    b: &DenseMatrix<f32>,
    c: &mut DenseMatrix<f32>,
    transpose_a: bool,
    transpose_b: bool,
) {
    let m = c.rows;
    let n = c.cols;
    let k_dim = if transpose_a { a.rows } else { a.cols };

    if transpose_a {
        assert_eq!(a.cols, m, "transposed A cols must match output rows");
    } else {
        assert_eq!(a.rows, m, "A rows must match output rows");
    }
    if transpose_b {
        assert_eq!(b.cols, k_dim, "transposed B cols must match inner dimension");
        assert_eq!(b.rows, n, "transposed B rows must match output cols");
    } else {
        assert_eq!(b.rows, k_dim, "B rows must match inner dimension");
        assert_eq!(b.cols, n, "B cols must match output cols");
    }

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for k in 0..k_dim {
                let a_val = if transpose_a { a.get(k, i) } else { a.get(i, k) };
                let b_val = if transpose_b { b.get(j, k) } else { b.get(k, j) };
                sum += a_val * b_val;
            }
            c.set(i, j, sum);
        }
    }
}

/// Scalar inner kernel for one output row, reused by the threaded variant
#[inline]
fn scalar_row(a_row: &[f32], b: &[f32], n: usize, c_row: &mut [f32]) {
    for (j, out) in c_row.iter_mut().enumerate().take(n) {
        let mut sum = 0.0f32;
        for (k, &a_val) in a_row.iter().enumerate() {
            sum += a_val * b[k * n + j];
        }
        *out = sum;
    }
}

/// Vectorized GEMM: 8 output columns at a time with an FMA reduction
/// across k, falling back to a partial store for the tail block
pub fn gemm_simd(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_conformant(a, b, c);
    assert_row_major(a, b, c);

    let n = c.cols;
    let k_dim = a.cols;
    let b_data = b.as_slice();

    for i in 0..c.rows {
        let a_row = a.row(i);
        simd::gemm_row_panel(a_row, b_data, n, c.row_mut(i), 0, n, 0, k_dim, true);
    }
}

/// Cache-tiled GEMM: cube blocking of the `(i, j, k)` iteration space
///
/// Partial sums accumulate into `C` directly, so the kernel zero-fills
/// the output before the block loops.
pub fn gemm_tiled(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>, tile: usize) {
    assert_conformant(a, b, c);
    assert_row_major(a, b, c);
    assert!(tile > 0, "tile size must be positive");

    let m = c.rows;
    let n = c.cols;
    let k_dim = a.cols;

    c.fill_zero();

    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let c_data = c.as_mut_slice();

    for i0 in (0..m).step_by(tile) {
        let i_end = (i0 + tile).min(m);
        for j0 in (0..n).step_by(tile) {
            let j_end = (j0 + tile).min(n);
            for k0 in (0..k_dim).step_by(tile) {
                let k_end = (k0 + tile).min(k_dim);

                for i in i0..i_end {
                    for k in k0..k_end {
                        let a_val = a_data[i * k_dim + k];
                        let b_row = &b_data[k * n..k * n + n];
                        let c_row = &mut c_data[i * n..i * n + n];
                        for j in j0..j_end {
                            c_row[j] += a_val * b_row[j];
                        }
                    }
                }
            }
        }
    }
}

/// Thread-parallel GEMM: disjoint output rows distributed across the
/// current rayon pool, scalar inner kernel unchanged
pub fn gemm_threaded(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_conformant(a, b, c);
    assert_row_major(a, b, c);

    let n = c.cols;
    let b_data = b.as_slice();

    c.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| scalar_row(a.row(i), b_data, n, c_row));
}

/// Thread-parallel vectorized GEMM: row decomposition with the SIMD
/// inner kernel
pub fn gemm_simd_threaded(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_conformant(a, b, c);
    assert_row_major(a, b, c);

    let n = c.cols;
    let k_dim = a.cols;
    let b_data = b.as_slice();

    c.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| {
            simd::gemm_row_panel(a.row(i), b_data, n, c_row, 0, n, 0, k_dim, true);
        });
}

/// Combined tiled + vectorized + parallel GEMM
///
/// Row-tile blocks are distributed across workers; within a block the
/// k dimension is processed in chunks, each chunk's vectorized partial
/// accumulation added into `C`. The first k-chunk zero-initializes each
/// output block, later chunks accumulate into it.
pub fn gemm_optimized(
    a: &DenseMatrix<f32>,
    b: &DenseMatrix<f32>,
    c: &mut DenseMatrix<f32>,
    tile: usize,
) {
    assert_conformant(a, b, c);
    assert_row_major(a, b, c);
    assert!(tile > 0, "tile size must be positive");

    let n = c.cols;
    let k_dim = a.cols;
    let b_data = b.as_slice();

    c.as_mut_slice()
        .par_chunks_mut(tile * n)
        .enumerate()
        .for_each(|(block_idx, c_block)| {
            let i0 = block_idx * tile;
            let block_rows = c_block.len() / n;

            for j0 in (0..n).step_by(tile) {
                let j_end = (j0 + tile).min(n);

                for k0 in (0..k_dim).step_by(tile) {
                    let k_end = (k0 + tile).min(k_dim);
                    let zero_init = k0 == 0;

                    for r in 0..block_rows {
                        let a_row = a.row(i0 + r);
                        let c_row = &mut c_block[r * n..(r + 1) * n];
                        simd::gemm_row_panel(a_row, b_data, n, c_row, j0, j_end, k0, k_end, zero_init);
                    }
                }
            }
        });
}

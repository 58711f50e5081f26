//! Sparse-times-dense (SpMM) kernel family
//!
//! CSR kernels iterate nonzeros row by row, so a decomposition over
//! output rows is write-disjoint and the parallel variants need no
//! synchronization. CSC kernels iterate by source column, and two
//! columns can carry nonzeros for the same output row; the threaded CSC
//! variant therefore repartitions the work into disjoint output-row
//! ranges instead of racing on shared rows.
//!
//! Sparse kernels only add contributions for existing nonzeros, so every
//! kernel zero-fills `C` before accumulating.

use rayon::prelude::*;

use crate::kernels::simd;
use crate::matrix::{CscMatrix, CsrMatrix, DenseMatrix, Layout};

fn assert_csr_conformant(a: &CsrMatrix<f32>, b: &DenseMatrix<f32>, c: &DenseMatrix<f32>) {
    assert_eq!(a.cols, b.rows, "inner dimensions must agree");
    assert_eq!(c.rows, a.rows, "output rows must match A");
    assert_eq!(c.cols, b.cols, "output cols must match B");
    assert!(
        b.layout == Layout::RowMajor && c.layout == Layout::RowMajor,
        "sparse kernels require row-major dense operands"
    );
}

fn assert_csc_conformant(a: &CscMatrix<f32>, b: &DenseMatrix<f32>, c: &DenseMatrix<f32>) {
    assert_eq!(a.cols, b.rows, "inner dimensions must agree");
    assert_eq!(c.rows, a.rows, "output rows must match A");
    assert_eq!(c.cols, b.cols, "output cols must match B");
    assert!(
        b.layout == Layout::RowMajor && c.layout == Layout::RowMajor,
        "sparse kernels require row-major dense operands"
    );
}

/// Scalar inner kernel for one CSR row: `c_row += Σ values[idx] * B[cols[idx], :]`
#[inline]
fn csr_row_scalar(
    values: &[f32],
    col_indices: &[usize],
    b: &[f32],
    n: usize,
    c_row: &mut [f32],
) {
    for (&val, &k) in values.iter().zip(col_indices.iter()) {
        let b_row = &b[k * n..k * n + n];
        for (out, &b_val) in c_row.iter_mut().zip(b_row.iter()) {
            *out += val * b_val;
        }
    }
}

/// Scalar CSR SpMM: `C[i,:] += A[i,k] * B[k,:]` over nonzero `(i, k)` only
pub fn csr_spmm_scalar(a: &CsrMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csr_conformant(a, b, c);

    let n = c.cols;
    let b_data = b.as_slice();
    c.fill_zero();

    for i in 0..a.rows {
        let start = a.row_ptrs[i];
        let end = a.row_ptrs[i + 1];
        csr_row_scalar(
            &a.values[start..end],
            &a.col_indices[start..end],
            b_data,
            n,
            c.row_mut(i),
        );
    }
}

/// Vectorized CSR SpMM: each nonzero is broadcast across 8 lanes and
/// fused-multiply-added against a contiguous row slice of `B`
pub fn csr_spmm_simd(a: &CsrMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csr_conformant(a, b, c);

    let n = c.cols;
    let b_data = b.as_slice();
    c.fill_zero();

    for i in 0..a.rows {
        let start = a.row_ptrs[i];
        let end = a.row_ptrs[i + 1];
        simd::spmm_row(
            &a.values[start..end],
            &a.col_indices[start..end],
            b_data,
            n,
            c.row_mut(i),
        );
    }
}

/// Thread-parallel CSR SpMM: disjoint output rows across the rayon pool,
/// scalar inner kernel
pub fn csr_spmm_threaded(a: &CsrMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csr_conformant(a, b, c);

    let n = c.cols;
    let b_data = b.as_slice();
    c.fill_zero();

    c.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| {
            let start = a.row_ptrs[i];
            let end = a.row_ptrs[i + 1];
            csr_row_scalar(
                &a.values[start..end],
                &a.col_indices[start..end],
                b_data,
                n,
                c_row,
            );
        });
}

/// Thread-parallel vectorized CSR SpMM
pub fn csr_spmm_simd_threaded(a: &CsrMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csr_conformant(a, b, c);

    let n = c.cols;
    let b_data = b.as_slice();
    c.fill_zero();

    c.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| {
            let start = a.row_ptrs[i];
            let end = a.row_ptrs[i + 1];
            simd::spmm_row(
                &a.values[start..end],
                &a.col_indices[start..end],
                b_data,
                n,
                c_row,
            );
        });
}

/// Scalar CSC SpMM: column-wise scatter, `C[i,:] += A[i,j] * B[j,:]`
pub fn csc_spmm_scalar(a: &CscMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csc_conformant(a, b, c);

    c.fill_zero();

    for j in 0..a.cols {
        let b_row = b.row(j);

        for idx in a.col_ptrs[j]..a.col_ptrs[j + 1] {
            let i = a.row_indices[idx];
            let val = a.values[idx];
            let c_row = c.row_mut(i);

            for (out, &b_val) in c_row.iter_mut().zip(b_row.iter()) {
                *out += val * b_val;
            }
        }
    }
}

/// Vectorized CSC SpMM: same traversal with an 8-lane axpy inner loop
pub fn csc_spmm_simd(a: &CscMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csc_conformant(a, b, c);

    c.fill_zero();

    for j in 0..a.cols {
        let b_row = b.row(j);

        for idx in a.col_ptrs[j]..a.col_ptrs[j + 1] {
            let i = a.row_indices[idx];
            let val = a.values[idx];
            simd::axpy(val, b_row, c.row_mut(i));
        }
    }
}

/// Thread-parallel CSC SpMM
///
/// A column decomposition would let two workers write the same output
/// row, so the work is repartitioned into disjoint output-row ranges:
/// each worker owns a contiguous block of `C` rows, scans every column
/// of `A`, and applies only the updates whose destination row falls in
/// its range. Each nonzero is visited once per worker, trading redundant
/// index reads for lock-free, write-disjoint accumulation.
pub fn csc_spmm_threaded(a: &CscMatrix<f32>, b: &DenseMatrix<f32>, c: &mut DenseMatrix<f32>) {
    assert_csc_conformant(a, b, c);

    let n = c.cols;
    let rows = c.rows;
    let b_data = b.as_slice();
    c.fill_zero();

    let workers = rayon::current_num_threads().max(1);
    let rows_per_task = rows.div_ceil(workers).max(1);

    c.as_mut_slice()
        .par_chunks_mut(rows_per_task * n)
        .enumerate()
        .for_each(|(task, c_block)| {
            let row_lo = task * rows_per_task;
            let row_hi = row_lo + c_block.len() / n;

            for j in 0..a.cols {
                let b_row = &b_data[j * n..j * n + n];

                for idx in a.col_ptrs[j]..a.col_ptrs[j + 1] {
                    let i = a.row_indices[idx];
                    if i < row_lo || i >= row_hi {
                        continue;
                    }

                    let val = a.values[idx];
                    let offset = (i - row_lo) * n;
                    simd::axpy(val, b_row, &mut c_block[offset..offset + n]);
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TOLERANCE;
    use crate::kernels::dense::gemm_scalar;
    use crate::matrix::{generate_random_dense, validate_results};

    fn dense_reference(a: &DenseMatrix<f32>, b: &DenseMatrix<f32>) -> DenseMatrix<f32> {
        let mut c = DenseMatrix::zeros(a.rows, b.cols);
        gemm_scalar(a, b, &mut c, false, false);
        c
    }

    #[test]
    fn test_csr_scalar_matches_dense_reference() {
        let a = generate_random_dense(24, 18, 0.6);
        let b = generate_random_dense(18, 21, 0.0);
        let expected = dense_reference(&a, &b);

        let mut c = DenseMatrix::zeros(24, 21);
        csr_spmm_scalar(&a.to_csr(), &b, &mut c);
        assert!(validate_results(&expected, &c, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_csr_simd_matches_dense_reference() {
        // n = 19 exercises the partial tail block
        let a = generate_random_dense(16, 20, 0.5);
        let b = generate_random_dense(20, 19, 0.0);
        let expected = dense_reference(&a, &b);

        let mut c = DenseMatrix::zeros(16, 19);
        csr_spmm_simd(&a.to_csr(), &b, &mut c);
        assert!(validate_results(&expected, &c, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_csr_threaded_variants_match() {
        let a = generate_random_dense(40, 30, 0.7);
        let b = generate_random_dense(30, 25, 0.0);
        let expected = dense_reference(&a, &b);
        let a_csr = a.to_csr();

        let mut c1 = DenseMatrix::zeros(40, 25);
        csr_spmm_threaded(&a_csr, &b, &mut c1);
        assert!(validate_results(&expected, &c1, DEFAULT_TOLERANCE));

        let mut c2 = DenseMatrix::zeros(40, 25);
        csr_spmm_simd_threaded(&a_csr, &b, &mut c2);
        assert!(validate_results(&expected, &c2, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_csc_variants_match_dense_reference() {
        let a = generate_random_dense(22, 28, 0.5);
        let b = generate_random_dense(28, 17, 0.0);
        let expected = dense_reference(&a, &b);
        let a_csc = a.to_csc();

        let mut c1 = DenseMatrix::zeros(22, 17);
        csc_spmm_scalar(&a_csc, &b, &mut c1);
        assert!(validate_results(&expected, &c1, DEFAULT_TOLERANCE));

        let mut c2 = DenseMatrix::zeros(22, 17);
        csc_spmm_simd(&a_csc, &b, &mut c2);
        assert!(validate_results(&expected, &c2, DEFAULT_TOLERANCE));

        let mut c3 = DenseMatrix::zeros(22, 17);
        csc_spmm_threaded(&a_csc, &b, &mut c3);
        assert!(validate_results(&expected, &c3, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_sparse_kernels_zero_fill_dirty_output() {
        let a = generate_random_dense(10, 10, 0.5);
        let b = generate_random_dense(10, 10, 0.0);
        let expected = dense_reference(&a, &b);

        // Pre-dirty the output; the kernel must zero-fill before
        // accumulating, so the garbage cannot leak through.
        let mut c = DenseMatrix::zeros(10, 10);
        for v in c.as_mut_slice() {
            *v = 999.0;
        }
        csr_spmm_scalar(&a.to_csr(), &b, &mut c);
        assert!(validate_results(&expected, &c, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_empty_rows_produce_zero_rows() {
        // Row 1 is entirely zero; its output row must stay zero
        let mut a = DenseMatrix::zeros(3, 3);
        a.set(0, 0, 1.0);
        a.set(2, 2, 2.0);
        let b = generate_random_dense(3, 4, 0.0);

        let mut c = DenseMatrix::zeros(3, 4);
        csr_spmm_simd(&a.to_csr(), &b, &mut c);

        assert!(c.row(1).iter().all(|&v| v == 0.0));
    }
}

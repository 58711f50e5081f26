//! Dense-to-sparse format conversions
//!
//! A value survives conversion iff `|v| > NONZERO_THRESHOLD`; the same
//! threshold is used for both formats so a dense matrix converted to CSR
//! and to CSC yields the identical set of `(row, col, value)` triples.

use crate::constants::NONZERO_THRESHOLD;
use crate::matrix::{CscMatrix, CsrMatrix, DenseMatrix};
use crate::utils::exclusive_scan;

impl DenseMatrix<f32> {
    /// Converts this dense matrix to CSR format
    ///
    /// One pass: row-major iteration matches the CSR value order, so
    /// values and column indices can be appended incrementally. Column
    /// indices within each row come out sorted.
    pub fn to_csr(&self) -> CsrMatrix<f32> {
        let mut row_ptrs = Vec::with_capacity(self.rows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();

        row_ptrs.push(0);

        for i in 0..self.rows {
            for j in 0..self.cols {
                let val = self.get(i, j);
                if val.abs() > NONZERO_THRESHOLD {
                    col_indices.push(j);
                    values.push(val);
                }
            }
            row_ptrs.push(values.len());
        }

        CsrMatrix::new(self.rows, self.cols, row_ptrs, col_indices, values)
    }

    /// Converts this dense matrix to CSC format
    ///
    /// Two passes to avoid dynamic resizing: count nonzeros per column,
    /// prefix-sum the counts into `col_ptrs`, then scatter values into
    /// their final positions.
    pub fn to_csc(&self) -> CscMatrix<f32> {
        let mut col_counts = vec![0usize; self.cols];

        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.get(i, j).abs() > NONZERO_THRESHOLD {
                    col_counts[j] += 1;
                }
            }
        }

        let col_ptrs = exclusive_scan(&col_counts);
        let nnz = col_ptrs[self.cols];

        let mut row_indices = vec![0usize; nnz];
        let mut values = vec![0.0f32; nnz];
        let mut col_offsets = vec![0usize; self.cols];

        for i in 0..self.rows {
            for j in 0..self.cols {
                let val = self.get(i, j);
                if val.abs() > NONZERO_THRESHOLD {
                    let pos = col_ptrs[j] + col_offsets[j];
                    row_indices[pos] = i;
                    values[pos] = val;
                    col_offsets[j] += 1;
                }
            }
        }

        CscMatrix::new(self.rows, self.cols, col_ptrs, row_indices, values)
    }
}

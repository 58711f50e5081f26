//! Conversions between our matrix formats and external libraries
//!
//! `sprs` and `ndarray` serve as independent reference implementations
//! for validating kernel output; nothing in the hot path depends on them.

use ndarray::Array2;
use sprs::CsMat;

use crate::matrix::{CsrMatrix, DenseMatrix};

/// Converts our CSR matrix format to a sprs `CsMat`
///
/// Column indices within each row are sorted by construction
/// (`DenseMatrix::to_csr` scans columns in order), which `CsMat::new`
/// requires.
pub fn to_sprs_csr(matrix: &CsrMatrix<f32>) -> CsMat<f32> {
    CsMat::new(
        (matrix.rows, matrix.cols),
        matrix.row_ptrs.clone(),
        matrix.col_indices.clone(),
        matrix.values.clone(),
    )
}

/// Converts a dense matrix to an ndarray `Array2`, honoring the layout tag
pub fn to_ndarray(matrix: &DenseMatrix<f32>) -> Array2<f32> {
    Array2::from_shape_fn((matrix.rows, matrix.cols), |(i, j)| matrix.get(i, j))
}

/// Converts an ndarray `Array2` into a row-major dense matrix
pub fn dense_from_ndarray(array: &Array2<f32>) -> DenseMatrix<f32> {
    let (rows, cols) = array.dim();
    let mut dense = DenseMatrix::zeros(rows, cols);

    for i in 0..rows {
        for j in 0..cols {
            dense.set(i, j, array[[i, j]]);
        }
    }

    dense
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::validate_results;

    #[test]
    fn test_csr_to_sprs_roundtrip() {
        // [1 2 0]
        // [0 3 0]
        // [4 0 5]
        let mut dense = DenseMatrix::zeros(3, 3);
        dense.set(0, 0, 1.0);
        dense.set(0, 1, 2.0);
        dense.set(1, 1, 3.0);
        dense.set(2, 0, 4.0);
        dense.set(2, 2, 5.0);

        let csr = dense.to_csr();
        let sprs_mat = to_sprs_csr(&csr);

        assert_eq!(sprs_mat.rows(), 3);
        assert_eq!(sprs_mat.cols(), 3);
        assert_eq!(sprs_mat.nnz(), 5);
        assert_eq!(sprs_mat.get(2, 2), Some(&5.0));
        assert_eq!(sprs_mat.get(1, 0), None);
    }

    #[test]
    fn test_ndarray_roundtrip() {
        let mut dense = DenseMatrix::zeros(2, 3);
        dense.set(0, 0, 1.5);
        dense.set(1, 2, -2.5);

        let array = to_ndarray(&dense);
        let back = dense_from_ndarray(&array);

        assert!(validate_results(&dense, &back, 0.0));
    }
}

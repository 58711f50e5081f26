//! Compressed Sparse Column (CSC) matrix format

use std::fmt;

use num_traits::Num;

/// A sparse matrix in Compressed Sparse Column (CSC) format
///
/// The transpose encoding of CSR: for column `j`, the half-open range
/// `[col_ptrs[j], col_ptrs[j + 1])` into `row_indices`/`values` lists
/// exactly that column's nonzeros.
#[derive(Clone)]
pub struct CscMatrix<T> {
    /// Number of rows in the matrix
    pub rows: usize,

    /// Number of columns in the matrix
    pub cols: usize,

    /// Column pointers (size: cols + 1), monotonically non-decreasing,
    /// `col_ptrs[0] == 0` and `col_ptrs[cols] == nnz`
    pub col_ptrs: Vec<usize>,

    /// Row indices (size: nnz)
    pub row_indices: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Copy + Num> CscMatrix<T> {
    /// Creates a new CSC matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - `col_ptrs.len()` must be `cols + 1`
    /// - `row_indices.len()` must equal `values.len()`
    /// - `col_ptrs[cols]` must equal `row_indices.len()`
    /// - every row index must be below `rows`
    pub fn new(
        rows: usize,
        cols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(col_ptrs.len(), cols + 1, "col_ptrs.len() must be cols + 1");
        assert_eq!(
            row_indices.len(),
            values.len(),
            "row_indices.len() must equal values.len()"
        );
        assert_eq!(
            col_ptrs[cols],
            row_indices.len(),
            "col_ptrs[cols] must equal row_indices.len()"
        );

        for &row in &row_indices {
            assert!(row < rows, "Row index {} out of bounds (rows = {})", row, rows);
        }

        Self {
            rows,
            cols,
            col_ptrs,
            row_indices,
            values,
        }
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the non-zero elements in column `j`
    ///
    /// Each item is a tuple `(row, value)`.
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(j < self.cols, "Column index out of bounds");

        let start = self.col_ptrs[j];
        let end = self.col_ptrs[j + 1];

        self.row_indices[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&row, val)| (row, val))
    }

    /// Collects all nonzeros as `(row, col, value)` triples, sorted
    /// row-major so they compare directly against `CsrMatrix::triples`
    pub fn triples(&self) -> Vec<(usize, usize, T)> {
        let mut out = Vec::with_capacity(self.nnz());

        for j in 0..self.cols {
            for (row, &val) in self.col_iter(j) {
                out.push((row, j, val));
            }
        }

        out.sort_by_key(|&(i, j, _)| (i, j));
        out
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for CscMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CscMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows, self.cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matrix() {
        // [1 2 0]
        // [0 3 0]
        // [4 0 5]
        let matrix = CscMatrix::new(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1.0f32, 4.0, 2.0, 3.0, 5.0],
        );

        assert_eq!(matrix.rows, 3);
        assert_eq!(matrix.cols, 3);
        assert_eq!(matrix.nnz(), 5);
    }

    #[test]
    fn test_col_iter() {
        let matrix = CscMatrix::new(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1, 4, 2, 3, 5],
        );

        let col0: Vec<_> = matrix.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col1: Vec<_> = matrix.col_iter(1).collect();
        assert_eq!(col1, vec![(0, &2), (1, &3)]);

        let col2: Vec<_> = matrix.col_iter(2).collect();
        assert_eq!(col2, vec![(2, &5)]);
    }

    #[test]
    fn test_triples_row_major_order() {
        let matrix = CscMatrix::new(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1, 4, 2, 3, 5],
        );

        assert_eq!(
            matrix.triples(),
            vec![(0, 0, 1), (0, 1, 2), (1, 1, 3), (2, 0, 4), (2, 2, 5)]
        );
    }

    #[test]
    #[should_panic(expected = "col_ptrs.len() must be cols + 1")]
    fn test_invalid_col_ptrs() {
        CscMatrix::new(3, 3, vec![0, 2, 4], vec![0, 2, 0, 1, 2], vec![1, 4, 2, 3, 5]);
    }
}

//! Compressed Sparse Row (CSR) matrix format

use std::fmt;

use num_traits::Num;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - `row_ptrs`: size `rows + 1`, indices into `col_indices` and `values`
/// - `col_indices`: size nnz, column index of each nonzero
/// - `values`: size nnz, the nonzero values in row-major order
///
/// For row `i`, the half-open range `[row_ptrs[i], row_ptrs[i + 1])` lists
/// exactly that row's nonzeros.
#[derive(Clone)]
pub struct CsrMatrix<T> {
    /// Number of rows in the matrix
    pub rows: usize,

    /// Number of columns in the matrix
    pub cols: usize,

    /// Row pointers (size: rows + 1), monotonically non-decreasing,
    /// `row_ptrs[0] == 0` and `row_ptrs[rows] == nnz`
    pub row_ptrs: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_indices: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Copy + Num> CsrMatrix<T> {
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - `row_ptrs.len()` must be `rows + 1`
    /// - `col_indices.len()` must equal `values.len()`
    /// - `row_ptrs[rows]` must equal `col_indices.len()`
    /// - every column index must be below `cols`
    pub fn new(
        rows: usize,
        cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptrs.len(), rows + 1, "row_ptrs.len() must be rows + 1");
        assert_eq!(
            col_indices.len(),
            values.len(),
            "col_indices.len() must equal values.len()"
        );
        assert_eq!(
            row_ptrs[rows],
            col_indices.len(),
            "row_ptrs[rows] must equal col_indices.len()"
        );

        for &col in &col_indices {
            assert!(col < cols, "Column index {} out of bounds (cols = {})", col, cols);
        }

        Self {
            rows,
            cols,
            row_ptrs,
            col_indices,
            values,
        }
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the non-zero elements in row `i`
    ///
    /// Each item is a tuple `(col, value)`.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.rows, "Row index out of bounds");

        let start = self.row_ptrs[i];
        let end = self.row_ptrs[i + 1];

        self.col_indices[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Collects all nonzeros as `(row, col, value)` triples in row-major order
    pub fn triples(&self) -> Vec<(usize, usize, T)> {
        let mut out = Vec::with_capacity(self.nnz());

        for i in 0..self.rows {
            for (col, &val) in self.row_iter(i) {
                out.push((i, col, val));
            }
        }

        out
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for CsrMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CsrMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows, self.cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_rows = 5.min(self.rows);

        for i in 0..max_rows {
            write!(f, "  row {}: ", i)?;
            let start = self.row_ptrs[i];
            let end = self.row_ptrs[i + 1];

            if start == end {
                writeln!(f, "(empty)")?;
            } else {
                let max_elements = 5.min(end - start);

                for idx in start..(start + max_elements) {
                    write!(f, "({}, {:?}) ", self.col_indices[idx], self.values[idx])?;
                }

                if end - start > max_elements {
                    write!(f, "... ({} more)", end - start - max_elements)?;
                }

                writeln!(f)?;
            }
        }

        if self.rows > max_rows {
            writeln!(f, "  ... ({} more rows)", self.rows - max_rows)?;
        }

        write!(f, "}}")
    }
}

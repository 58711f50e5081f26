//! Dense matrix with an explicit storage-layout tag

use std::fmt;

use aligned_vec::AVec;
use num_traits::Num;

use crate::constants::BUFFER_ALIGN;

/// Linear-index mapping for a dense matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `(i, j)` maps to `i * cols + j`
    RowMajor,
    /// `(i, j)` maps to `j * rows + i`
    ColMajor,
}

/// A dense `rows × cols` matrix backed by a cache-line-aligned buffer
///
/// The layout tag governs the linear-index mapping; performance kernels
/// require row-major storage so rows can be handed out as contiguous
/// slices, while the scalar reference honors either layout through the
/// `(i, j)` accessors.
#[derive(Clone)]
pub struct DenseMatrix<T> {
    /// Number of rows
    pub rows: usize,

    /// Number of columns
    pub cols: usize,

    /// Storage layout
    pub layout: Layout,

    /// Matrix values (size: rows * cols), aligned for SIMD loads
    pub data: AVec<T>,
}

impl<T: Copy + Num> DenseMatrix<T> {
    /// Creates a zero-filled row-major matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::with_layout(rows, cols, Layout::RowMajor)
    }

    /// Creates a zero-filled matrix with the given layout
    pub fn with_layout(rows: usize, cols: usize, layout: Layout) -> Self {
        let data = AVec::from_iter(BUFFER_ALIGN, std::iter::repeat(T::zero()).take(rows * cols));

        Self {
            rows,
            cols,
            layout,
            data,
        }
    }

    /// Maps a `(row, col)` pair to a linear index according to the layout
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        match self.layout {
            Layout::RowMajor => i * self.cols + j,
            Layout::ColMajor => j * self.rows + i,
        }
    }

    /// Returns the value at `(i, j)`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.index(i, j)]
    }

    /// Sets the value at `(i, j)`
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Resets every element to zero
    pub fn fill_zero(&mut self) {
        self.data.fill(T::zero());
    }

    /// Returns row `i` as a contiguous slice
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not row-major.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        assert_eq!(self.layout, Layout::RowMajor, "row access requires row-major layout");
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns row `i` as a mutable contiguous slice
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not row-major.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert_eq!(self.layout, Layout::RowMajor, "row access requires row-major layout");
        let cols = self.cols;
        &mut self.data[i * cols..(i + 1) * cols]
    }

    /// Returns the underlying buffer as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the underlying buffer as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl DenseMatrix<f32> {
    /// Counts the values classified as nonzero (`|v| > NONZERO_THRESHOLD`)
    pub fn count_nonzeros(&self) -> usize {
        self.data
            .iter()
            .filter(|v| v.abs() > crate::constants::NONZERO_THRESHOLD)
            .count()
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DenseMatrix {{")?;
        writeln!(f, "  dimensions: {} × {} ({:?})", self.rows, self.cols, self.layout)?;

        let max_rows = 4.min(self.rows);
        let max_cols = 8.min(self.cols);

        for i in 0..max_rows {
            write!(f, "  [")?;
            for j in 0..max_cols {
                write!(f, " {:?}", self.get(i, j))?;
            }
            if self.cols > max_cols {
                write!(f, " ...")?;
            }
            writeln!(f, " ]")?;
        }

        if self.rows > max_rows {
            writeln!(f, "  ... ({} more rows)", self.rows - max_rows)?;
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_invariant() {
        let m = DenseMatrix::<f32>::zeros(3, 5);
        assert_eq!(m.data.len(), 15);
        assert!(m.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_layout_index_mapping() {
        let rm = DenseMatrix::<f32>::with_layout(3, 4, Layout::RowMajor);
        assert_eq!(rm.index(1, 2), 6);

        let cm = DenseMatrix::<f32>::with_layout(3, 4, Layout::ColMajor);
        assert_eq!(cm.index(1, 2), 7);
    }

    #[test]
    fn test_get_set_roundtrip_both_layouts() {
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            let mut m = DenseMatrix::<f32>::with_layout(4, 3, layout);
            m.set(2, 1, 7.5);
            m.set(0, 2, -1.0);
            assert_eq!(m.get(2, 1), 7.5);
            assert_eq!(m.get(0, 2), -1.0);
            assert_eq!(m.get(1, 1), 0.0);
        }
    }

    #[test]
    fn test_row_slice() {
        let mut m = DenseMatrix::<f32>::zeros(2, 3);
        m.set(1, 0, 1.0);
        m.set(1, 2, 3.0);
        assert_eq!(m.row(1), &[1.0, 0.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "row-major layout")]
    fn test_row_slice_rejects_col_major() {
        let m = DenseMatrix::<f32>::with_layout(2, 3, Layout::ColMajor);
        let _ = m.row(0);
    }

    #[test]
    fn test_fill_zero() {
        let mut m = DenseMatrix::<f32>::zeros(2, 2);
        m.set(0, 0, 5.0);
        m.fill_zero();
        assert!(m.data.iter().all(|&v| v == 0.0));
    }
}

//! Synthetic matrix generation

use rand::Rng;

use crate::matrix::DenseMatrix;

/// Generates a random dense matrix with the requested sparsity
///
/// Every cell is an independent Bernoulli trial with success probability
/// `1 - sparsity`; on success the cell gets a uniform value in `[0, 1)`,
/// otherwise exactly `0.0`. The observed zero-fraction converges to
/// `sparsity` for large matrices but individual draws are unseeded, so
/// callers must not expect run-to-run reproducibility.
///
/// # Panics
///
/// Panics if `sparsity` is not in `[0, 1)`.
pub fn generate_random_dense(rows: usize, cols: usize, sparsity: f32) -> DenseMatrix<f32> {
    assert!(
        (0.0..1.0).contains(&sparsity),
        "sparsity must be in [0, 1), got {}",
        sparsity
    );

    let mut rng = rand::thread_rng();
    let keep_probability = f64::from(1.0 - sparsity);
    let mut matrix = DenseMatrix::zeros(rows, cols);

    for cell in matrix.as_mut_slice() {
        if rng.gen_bool(keep_probability) {
            *cell = rng.gen::<f32>();
        }
    }

    matrix
}

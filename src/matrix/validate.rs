//! Elementwise result validation across kernel implementations

use crate::matrix::DenseMatrix;

/// Compares a candidate result against a reference, cell by cell
///
/// Returns `false` if dimensions differ. Otherwise each cell must satisfy
/// `|ref - test| / max(|ref|, 1.0) <= tolerance`: the `max(., 1.0)`
/// denominator makes this an absolute check near zero and a relative check
/// away from zero, so a reference value of exactly `0.0` never divides by
/// zero and small absolute noise on tiny references is accepted.
///
/// Accumulation order differs between scalar, tiled, and vectorized
/// kernels, so cross-variant comparison must go through this check rather
/// than bit-exact equality.
pub fn validate_results(
    reference: &DenseMatrix<f32>,
    candidate: &DenseMatrix<f32>,
    tolerance: f32,
) -> bool {
    if reference.rows != candidate.rows || reference.cols != candidate.cols {
        return false;
    }

    for i in 0..reference.rows {
        for j in 0..reference.cols {
            let ref_val = reference.get(i, j);
            let test_val = candidate.get(i, j);
            let diff = (ref_val - test_val).abs();
            let denom = ref_val.abs().max(1.0);

            if diff / denom > tolerance {
                return false;
            }
        }
    }

    true
}

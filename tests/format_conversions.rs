//! Format conversion properties: CSR/CSC triple agreement, structural
//! invariants, and the statistical behavior of the generator

use matbench::matrix::{generate_random_dense, DenseMatrix};
use proptest::prelude::*;

#[test]
fn four_by_four_with_three_nonzeros() {
    let mut m = DenseMatrix::zeros(4, 4);
    m.set(0, 1, 2.5);
    m.set(1, 3, -1.0);
    m.set(3, 0, 0.75);

    let csr = m.to_csr();
    assert_eq!(csr.row_ptrs.len(), 5);
    assert_eq!(csr.row_ptrs[4], 3);
    assert_eq!(csr.values.len(), 3);
    assert_eq!(csr.col_indices.len(), 3);
    assert_eq!(
        csr.triples(),
        vec![(0, 1, 2.5), (1, 3, -1.0), (3, 0, 0.75)]
    );
}

#[test]
fn row_ptrs_are_monotone() {
    let m = generate_random_dense(40, 25, 0.6);
    let csr = m.to_csr();

    assert_eq!(csr.row_ptrs[0], 0);
    assert_eq!(csr.row_ptrs[40], csr.nnz());
    assert!(csr.row_ptrs.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn generator_sparsity_within_statistical_bound() {
    // ≥10,000 cells; the zero count is binomial, so ±3σ covers all but
    // ~0.3% of runs
    for &sparsity in &[0.1f32, 0.5, 0.9] {
        let m = generate_random_dense(100, 120, sparsity);
        let cells = 12_000.0f32;

        let zeros = m.as_slice().iter().filter(|&&v| v == 0.0).count() as f32;
        let sigma = (cells * sparsity * (1.0 - sparsity)).sqrt();

        assert!(
            (zeros - cells * sparsity).abs() <= 3.0 * sigma,
            "zero count {} outside ±3σ of {} at sparsity {}",
            zeros,
            cells * sparsity,
            sparsity
        );
    }
}

proptest! {
    #[test]
    fn csr_and_csc_recover_identical_triples(
        rows in 1usize..20,
        cols in 1usize..20,
        sparsity in 0.0f32..0.95,
    ) {
        let m = generate_random_dense(rows, cols, sparsity);
        prop_assert_eq!(m.to_csr().triples(), m.to_csc().triples());
    }

    #[test]
    fn csr_nnz_matches_dense_count(
        rows in 1usize..24,
        cols in 1usize..24,
        sparsity in 0.0f32..0.95,
    ) {
        let m = generate_random_dense(rows, cols, sparsity);
        prop_assert_eq!(m.to_csr().nnz(), m.count_nonzeros());
    }
}

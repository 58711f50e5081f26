//! Kernel families and closed-variant dispatch
//!
//! Kernel selection is a closed enumeration resolved at configuration
//! time: an unsupported `(kernel type, implementation)` pair is rejected
//! when the kernel is built, never silently no-opped at invocation.

pub mod dense;
pub mod simd;
pub mod sparse;

use std::fmt;

use crate::error::{BenchError, Result};
use crate::matrix::{CscMatrix, CsrMatrix, DenseMatrix};

/// Kernel family operating on a particular left-operand representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    /// Dense × dense GEMM
    Dense,
    /// CSR sparse × dense SpMM
    Csr,
    /// CSC sparse × dense SpMM
    Csc,
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            KernelType::Dense => "dense",
            KernelType::Csr => "csr",
            KernelType::Csc => "csc",
        };
        write!(f, "{}", tag)
    }
}

/// Execution strategy within a kernel family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Implementation {
    /// Triple-loop reference
    Scalar,
    /// 8-lane vectorized
    Simd,
    /// Row-parallel with the scalar inner kernel
    Threaded,
    /// Row-parallel with the vectorized inner kernel
    SimdThreaded,
    /// Cache-blocked
    Tiled,
    /// Tiled + vectorized + parallel combined
    Optimized,
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Implementation::Scalar => "scalar",
            Implementation::Simd => "simd",
            Implementation::Threaded => "threaded",
            Implementation::SimdThreaded => "simd_threaded",
            Implementation::Tiled => "tiled",
            Implementation::Optimized => "optimized",
        };
        write!(f, "{}", tag)
    }
}

/// Operand set prepared for one kernel family
///
/// The engine generates a dense left operand and converts it to the
/// representation the kernel consumes; `B` is always dense row-major.
pub enum Operands {
    Dense {
        a: DenseMatrix<f32>,
        b: DenseMatrix<f32>,
    },
    Csr {
        a: CsrMatrix<f32>,
        b: DenseMatrix<f32>,
    },
    Csc {
        a: CscMatrix<f32>,
        b: DenseMatrix<f32>,
    },
}

impl Operands {
    /// The kernel family these operands feed
    pub fn kernel_type(&self) -> KernelType {
        match self {
            Operands::Dense { .. } => KernelType::Dense,
            Operands::Csr { .. } => KernelType::Csr,
            Operands::Csc { .. } => KernelType::Csc,
        }
    }

    /// Nonzero count of the sparse left operand, if any
    pub fn nnz(&self) -> Option<usize> {
        match self {
            Operands::Dense { .. } => None,
            Operands::Csr { a, .. } => Some(a.nnz()),
            Operands::Csc { a, .. } => Some(a.nnz()),
        }
    }
}

/// A resolved, runnable kernel
///
/// Tile sizes are bound at resolution time so invocation needs no
/// further configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    DenseScalar,
    DenseSimd,
    DenseThreaded,
    DenseSimdThreaded,
    DenseTiled(usize),
    DenseOptimized(usize),
    CsrScalar,
    CsrSimd,
    CsrThreaded,
    CsrSimdThreaded,
    CscScalar,
    CscSimd,
    CscThreaded,
}

impl Kernel {
    /// Resolves a `(kernel type, implementation)` pair into a runnable
    /// kernel, rejecting combinations with no implementation
    pub fn resolve(kind: KernelType, implementation: Implementation, tile: usize) -> Result<Self> {
        use Implementation as Imp;
        use KernelType as Kt;

        let kernel = match (kind, implementation) {
            (Kt::Dense, Imp::Scalar) => Kernel::DenseScalar,
            (Kt::Dense, Imp::Simd) => Kernel::DenseSimd,
            (Kt::Dense, Imp::Threaded) => Kernel::DenseThreaded,
            (Kt::Dense, Imp::SimdThreaded) => Kernel::DenseSimdThreaded,
            (Kt::Dense, Imp::Tiled) => Kernel::DenseTiled(tile),
            (Kt::Dense, Imp::Optimized) => Kernel::DenseOptimized(tile),
            (Kt::Csr, Imp::Scalar) => Kernel::CsrScalar,
            (Kt::Csr, Imp::Simd) => Kernel::CsrSimd,
            (Kt::Csr, Imp::Threaded) => Kernel::CsrThreaded,
            (Kt::Csr, Imp::SimdThreaded) => Kernel::CsrSimdThreaded,
            (Kt::Csc, Imp::Scalar) => Kernel::CscScalar,
            (Kt::Csc, Imp::Simd) => Kernel::CscSimd,
            (Kt::Csc, Imp::Threaded) => Kernel::CscThreaded,
            _ => {
                return Err(BenchError::UnsupportedKernel {
                    kernel: kind,
                    implementation,
                })
            }
        };

        Ok(kernel)
    }

    /// Whether this kernel distributes work across a thread pool
    pub fn is_threaded(&self) -> bool {
        matches!(
            self,
            Kernel::DenseThreaded
                | Kernel::DenseSimdThreaded
                | Kernel::DenseOptimized(_)
                | Kernel::CsrThreaded
                | Kernel::CsrSimdThreaded
                | Kernel::CscThreaded
        )
    }

    /// Runs the kernel synchronously; returns once all writes to `c`
    /// are complete (fork-join for the threaded variants)
    ///
    /// # Panics
    ///
    /// Panics if the operand set does not match the kernel family or
    /// the shapes are non-conformant (precondition violations).
    pub fn run(&self, operands: &Operands, c: &mut DenseMatrix<f32>) {
        match (self, operands) {
            (Kernel::DenseScalar, Operands::Dense { a, b }) => {
                dense::gemm_scalar(a, b, c, false, false)
            }
            (Kernel::DenseSimd, Operands::Dense { a, b }) => dense::gemm_simd(a, b, c),
            (Kernel::DenseThreaded, Operands::Dense { a, b }) => dense::gemm_threaded(a, b, c),
            (Kernel::DenseSimdThreaded, Operands::Dense { a, b }) => {
                dense::gemm_simd_threaded(a, b, c)
            }
            (Kernel::DenseTiled(tile), Operands::Dense { a, b }) => {
                dense::gemm_tiled(a, b, c, *tile)
            }
            (Kernel::DenseOptimized(tile), Operands::Dense { a, b }) => {
                dense::gemm_optimized(a, b, c, *tile)
            }
            (Kernel::CsrScalar, Operands::Csr { a, b }) => sparse::csr_spmm_scalar(a, b, c),
            (Kernel::CsrSimd, Operands::Csr { a, b }) => sparse::csr_spmm_simd(a, b, c),
            (Kernel::CsrThreaded, Operands::Csr { a, b }) => sparse::csr_spmm_threaded(a, b, c),
            (Kernel::CsrSimdThreaded, Operands::Csr { a, b }) => {
                sparse::csr_spmm_simd_threaded(a, b, c)
            }
            (Kernel::CscScalar, Operands::Csc { a, b }) => sparse::csc_spmm_scalar(a, b, c),
            (Kernel::CscSimd, Operands::Csc { a, b }) => sparse::csc_spmm_simd(a, b, c),
            (Kernel::CscThreaded, Operands::Csc { a, b }) => sparse::csc_spmm_threaded(a, b, c),
            _ => panic!("operand set does not match kernel family"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TILE_SIZE;

    #[test]
    fn test_resolve_valid_combinations() {
        assert_eq!(
            Kernel::resolve(KernelType::Dense, Implementation::Optimized, 32).unwrap(),
            Kernel::DenseOptimized(32)
        );
        assert_eq!(
            Kernel::resolve(KernelType::Csr, Implementation::SimdThreaded, DEFAULT_TILE_SIZE)
                .unwrap(),
            Kernel::CsrSimdThreaded
        );
        assert_eq!(
            Kernel::resolve(KernelType::Csc, Implementation::Threaded, DEFAULT_TILE_SIZE).unwrap(),
            Kernel::CscThreaded
        );
    }

    #[test]
    fn test_resolve_rejects_unsupported_pairs() {
        for (kind, imp) in [
            (KernelType::Csr, Implementation::Tiled),
            (KernelType::Csr, Implementation::Optimized),
            (KernelType::Csc, Implementation::SimdThreaded),
            (KernelType::Csc, Implementation::Tiled),
            (KernelType::Csc, Implementation::Optimized),
        ] {
            let err = Kernel::resolve(kind, imp, DEFAULT_TILE_SIZE).unwrap_err();
            assert!(matches!(err, BenchError::UnsupportedKernel { .. }));
        }
    }

    #[test]
    fn test_threaded_classification() {
        assert!(Kernel::DenseOptimized(64).is_threaded());
        assert!(Kernel::CscThreaded.is_threaded());
        assert!(!Kernel::DenseScalar.is_threaded());
        assert!(!Kernel::CsrSimd.is_threaded());
    }

    #[test]
    #[should_panic(expected = "operand set does not match kernel family")]
    fn test_mismatched_operands_fail_fast() {
        let a = DenseMatrix::zeros(2, 2);
        let b = DenseMatrix::zeros(2, 2);
        let mut c = DenseMatrix::zeros(2, 2);
        Kernel::CsrScalar.run(&Operands::Dense { a, b }, &mut c);
    }
}

//! # matbench: dense vs sparse matrix multiplication benchmark suite
//!
//! matbench measures how dense GEMM and sparse SpMM kernel variants
//! behave across matrix size, sparsity, and thread count, and relates
//! the achieved throughput to a roofline model of the host machine.
//!
//! ## Overview
//!
//! The suite is built from small, composable layers:
//!
//! - **Matrix containers**: dense (row- or column-major), CSR, and CSC
//!   representations with explicit indexing conventions.
//! - **Generators**: synthetic dense matrices with a Bernoulli sparsity
//!   mask, plus dense→CSR/CSC conversion.
//! - **Kernel families**: dense GEMM (scalar, SIMD, tiled, threaded,
//!   combined) and sparse SpMM (CSR and CSC, scalar/SIMD/threaded),
//!   all computing the same product under different strategies.
//! - **Benchmark engine**: warm-up, repeated timed trials, averaging,
//!   and derived metrics (GFLOP/s, arithmetic intensity, cycles per
//!   nonzero).
//! - **Hardware characterization**: a streaming bandwidth probe and an
//!   explicit cache/frequency profile feeding the roofline model.
//!
//! ## Usage
//!
//! Run one experiment:
//!
//! ```no_run
//! use matbench::bench::{run_experiment, ExperimentConfig, TrialOptions, HardwareProfile};
//! use matbench::kernels::{Implementation, KernelType};
//!
//! let hw = HardwareProfile::characterize();
//! let config = ExperimentConfig::square(512, 0.05, 4, KernelType::Csr, Implementation::SimdThreaded);
//! let result = run_experiment(&config, TrialOptions::default(), &hw).unwrap();
//! println!("{:.2} GFLOP/s", result.gflops);
//! ```
//!
//! Or invoke a kernel directly:
//!
//! ```
//! use matbench::matrix::{generate_random_dense, DenseMatrix};
//! use matbench::kernels::dense::gemm_simd;
//!
//! let a = generate_random_dense(64, 64, 0.0);
//! let b = generate_random_dense(64, 64, 0.0);
//! let mut c = DenseMatrix::zeros(64, 64);
//! gemm_simd(&a, &b, &mut c);
//! ```

pub mod bench;
pub mod constants;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod utils;

// Re-export primary components
pub use bench::{
    run_experiment, ExperimentConfig, ExperimentResult, HardwareProfile, RooflineModel,
    SweepParams, TrialOptions,
};
pub use error::{BenchError, Result};
pub use kernels::{Implementation, Kernel, KernelType, Operands};
pub use matrix::{generate_random_dense, validate_results, CscMatrix, CsrMatrix, DenseMatrix, Layout};

/// Version information for the benchmark suite
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

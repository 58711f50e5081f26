//! Experiment execution: operand generation, timed trials, and derived
//! performance metrics

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use rayon::ThreadPoolBuilder;
use tracing::warn;

use crate::bench::config::{ExperimentConfig, TrialOptions};
use crate::bench::hardware::HardwareProfile;
use crate::error::{BenchError, Result};
use crate::kernels::{Implementation, Kernel, KernelType, Operands};
use crate::matrix::{generate_random_dense, DenseMatrix};

/// One measured experiment, ready for CSV serialization
///
/// `flops`, `bytes_accessed`, and `arithmetic_intensity` are derived
/// from the operand shapes and structure alone, so they stay exact even
/// when the timed run fails and the timing columns are zeroed.
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub kernel_type: KernelType,
    pub implementation: Implementation,
    /// Square edge (m = k = n experiments) or m for rectangular shapes
    pub size: usize,
    pub sparsity: f32,
    pub threads: usize,
    /// Mean wall time per invocation over the timed iterations
    pub time_seconds: f64,
    pub gflops: f64,
    /// Estimated cycles per nonzero of the left operand, derived from
    /// the profile's nominal frequency
    pub cpnz: f64,
    pub flops: u64,
    pub bytes_accessed: u64,
    pub arithmetic_intensity: f64,
}

/// Floating-point operation count for the multiply
///
/// Dense: every output cell folds `k` multiply-add pairs. Sparse: each
/// stored nonzero of `A` contributes one multiply-add per output column.
fn flop_count(config: &ExperimentConfig, nnz: Option<usize>) -> u64 {
    match nnz {
        None => 2 * (config.m as u64) * (config.n as u64) * (config.k as u64),
        Some(nnz) => 2 * (nnz as u64) * (config.n as u64),
    }
}

/// Minimum bytes touched by the multiply, assuming each operand is read
/// or written once
fn byte_count(config: &ExperimentConfig, nnz: Option<usize>) -> u64 {
    let elem = std::mem::size_of::<f32>() as u64;
    let (m, k, n) = (config.m as u64, config.k as u64, config.n as u64);

    match nnz {
        None => (m * k + k * n + m * n) * elem,
        Some(nnz) => {
            // values + indices, row/col pointer array, dense B, dense C
            let nnz = nnz as u64;
            nnz * (elem + elem) + (m + 1) * 8 + k * n * elem + m * n * elem
        }
    }
}

fn run_trials(
    kernel: Kernel,
    operands: &Operands,
    c: &mut DenseMatrix<f32>,
    opts: TrialOptions,
) -> f64 {
    for _ in 0..opts.warmup {
        c.fill_zero();
        kernel.run(operands, c);
    }

    let iterations = opts.iterations.max(1);
    let mut total = 0.0;

    for _ in 0..iterations {
        // Zeroing the output is setup, not kernel work
        c.fill_zero();
        let start = Instant::now();
        kernel.run(operands, c);
        total += start.elapsed().as_secs_f64();
    }

    total / iterations as f64
}

/// Runs one experiment: resolves the kernel, generates fresh operands,
/// times repeated invocations, and derives throughput metrics
///
/// An unsupported kernel combination is a hard error. A panicking kernel
/// is contained: the result keeps its exact work counters and reports
/// zeroed timing columns, so a sweep continues past the failure.
pub fn run_experiment(
    config: &ExperimentConfig,
    opts: TrialOptions,
    hw: &HardwareProfile,
) -> Result<ExperimentResult> {
    let kernel = Kernel::resolve(config.kernel_type, config.implementation, config.tile_size)?;

    let a = generate_random_dense(config.m, config.k, config.sparsity);
    let b = generate_random_dense(config.k, config.n, 0.0);

    let operands = match config.kernel_type {
        KernelType::Dense => Operands::Dense { a, b },
        KernelType::Csr => Operands::Csr { a: a.to_csr(), b },
        KernelType::Csc => Operands::Csc { a: a.to_csc(), b },
    };

    let nnz = operands.nnz();
    let flops = flop_count(config, nnz);
    let bytes_accessed = byte_count(config, nnz);
    let arithmetic_intensity = flops as f64 / bytes_accessed as f64;

    let mut c = DenseMatrix::zeros(config.m, config.n);

    let timed = catch_unwind(AssertUnwindSafe(|| -> Result<f64> {
        if kernel.is_threaded() {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build()
                .map_err(|e| BenchError::ThreadPool(e.to_string()))?;
            Ok(pool.install(|| run_trials(kernel, &operands, &mut c, opts)))
        } else {
            Ok(run_trials(kernel, &operands, &mut c, opts))
        }
    }));

    let time_seconds = match timed {
        Ok(result) => result?,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(
                kernel = %config.kernel_type,
                implementation = %config.implementation,
                error = %BenchError::KernelPanic(msg),
                "experiment failed, recording zeroed timing"
            );
            0.0
        }
    };

    // Cycle estimate per stored nonzero; dense kernels touch every cell
    let effective_nnz = nnz.unwrap_or(config.m * config.k).max(1);
    let (gflops, cpnz) = if time_seconds > 0.0 {
        (
            flops as f64 / time_seconds / 1e9,
            time_seconds * hw.cpu_freq_ghz * 1e9 / effective_nnz as f64,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(ExperimentResult {
        kernel_type: config.kernel_type,
        implementation: config.implementation,
        size: config.m,
        sparsity: config.sparsity,
        threads: config.threads,
        time_seconds,
        gflops,
        cpnz,
        flops,
        bytes_accessed,
        arithmetic_intensity,
    })
}

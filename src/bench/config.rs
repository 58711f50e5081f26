//! Experiment and sweep configuration

use crate::constants::DEFAULT_TILE_SIZE;
use crate::kernels::{Implementation, KernelType};

/// Full description of one measured experiment
///
/// An experiment is one `(kernel, shape, sparsity, threads)` point; the
/// engine resolves it to a runnable kernel, generates operands, and
/// times repeated invocations.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Rows of `A` and `C`
    pub m: usize,
    /// Inner dimension (`A` cols, `B` rows)
    pub k: usize,
    /// Cols of `B` and `C`
    pub n: usize,
    /// Fraction of `A` entries generated as zero, in `[0, 1)`
    pub sparsity: f32,
    /// Worker count for threaded kernels (ignored by serial kernels)
    pub threads: usize,
    /// Left-operand representation
    pub kernel_type: KernelType,
    /// Execution strategy
    pub implementation: Implementation,
    /// Tile edge for the blocked dense kernels
    pub tile_size: usize,
}

impl ExperimentConfig {
    /// Square `size × size × size` experiment with the default tile
    pub fn square(
        size: usize,
        sparsity: f32,
        threads: usize,
        kernel_type: KernelType,
        implementation: Implementation,
    ) -> Self {
        Self {
            m: size,
            k: size,
            n: size,
            sparsity,
            threads,
            kernel_type,
            implementation,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Trial repetition policy for one experiment
#[derive(Debug, Clone, Copy)]
pub struct TrialOptions {
    /// Untimed invocations discarded before measurement
    pub warmup: usize,
    /// Timed invocations averaged into the reported figure
    pub iterations: usize,
}

impl Default for TrialOptions {
    fn default() -> Self {
        Self {
            warmup: 1,
            iterations: 3,
        }
    }
}

/// Parameter grid for the comprehensive sweep
#[derive(Debug, Clone)]
pub struct SweepParams {
    /// Square matrix sizes to cover
    pub sizes: Vec<usize>,
    /// Sparsity levels for the left operand
    pub sparsities: Vec<f32>,
    /// Thread counts for the threaded kernel variants
    pub thread_counts: Vec<usize>,
    /// Timed repetitions per experiment
    pub repetitions: usize,
    /// Warmup invocations per experiment
    pub warmup: usize,
    /// Run the cross-kernel validation pass before sweeping
    pub validate: bool,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            sizes: vec![64, 128, 256, 512, 1024],
            sparsities: vec![0.001, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5],
            thread_counts: vec![1, 2, 4, 8],
            repetitions: 3,
            warmup: 1,
            validate: true,
        }
    }
}

impl SweepParams {
    /// Trial policy derived from the sweep's repetition settings
    pub fn trial_options(&self) -> TrialOptions {
        TrialOptions {
            warmup: self.warmup,
            iterations: self.repetitions,
        }
    }
}

//! Error types for the benchmark engine
//!
//! Only the kernel-invocation boundary classifies errors; hot loops stay
//! branch-free and signal precondition violations by panicking, which the
//! engine converts to a per-experiment failure.

use thiserror::Error;

use crate::kernels::{Implementation, KernelType};

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while configuring or running experiments
#[derive(Debug, Error)]
pub enum BenchError {
    /// The (kernel type, implementation) pair selects no kernel.
    /// Rejected at configuration time rather than silently no-opping.
    #[error("unsupported kernel combination: {kernel}/{implementation}")]
    UnsupportedKernel {
        kernel: KernelType,
        implementation: Implementation,
    },

    /// A kernel invocation panicked; the experiment is recorded as failed
    #[error("kernel execution failed: {0}")]
    KernelPanic(String),

    /// Worker pool construction failed
    #[error("thread pool construction failed: {0}")]
    ThreadPool(String),

    /// Result serialization failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Centralized constants for the benchmark suite
//!
//! All hardcoded constants used throughout the codebase live here.
//! New constants should be added here rather than scattered through the code.

// ============================================================================
// NUMERIC THRESHOLDS
// ============================================================================

/// Magnitude below which a dense value is treated as a structural zero
/// when converting to a sparse format
pub const NONZERO_THRESHOLD: f32 = 1e-10;

/// Default relative tolerance for cross-kernel result validation
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

// ============================================================================
// KERNEL TUNING
// ============================================================================

/// Default cube tile edge for blocked GEMM kernels
pub const DEFAULT_TILE_SIZE: usize = 64;

/// Alignment in bytes for dense matrix buffers (one cache line)
pub const BUFFER_ALIGN: usize = 64;

// ============================================================================
// HARDWARE CHARACTERIZATION DEFAULTS
//
// Empirical placeholders tied to no particular machine. They are
// configuration inputs consumed by `HardwareProfile`, never derived.
// ============================================================================

/// Default L1 data cache size (32KB)
pub const DEFAULT_L1_CACHE_SIZE: usize = 32 * 1024;

/// Default L2 cache size (256KB)
pub const DEFAULT_L2_CACHE_SIZE: usize = 256 * 1024;

/// Default L3 cache size (12MB)
pub const DEFAULT_L3_CACHE_SIZE: usize = 12 * 1024 * 1024;

/// Nominal CPU frequency in GHz used for cycle estimates
pub const DEFAULT_CPU_FREQ_GHZ: f64 = 3.5;

/// Practical peak compute rate in GFLOP/s for the roofline ceiling
pub const DEFAULT_PEAK_GFLOPS: f64 = 100.0;

/// Total working set for the streaming bandwidth probe (256MB across
/// three streams, large enough to defeat the last-level cache)
pub const BANDWIDTH_BUFFER_BYTES: usize = 256 * 1024 * 1024;

/// Number of bandwidth probe repetitions; the best figure is kept so
/// first-touch page faults do not skew the measurement
pub const BANDWIDTH_REPETITIONS: usize = 5;

// ============================================================================
// SWEEP DEFAULTS
// ============================================================================

/// Sparsity at or below which the comprehensive sweep skips the sparse
/// kernels (the encoding degenerates to dense with extra indirection)
pub const SPARSE_SPARSITY_FLOOR: f32 = 0.001;

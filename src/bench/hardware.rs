//! Hardware characterization: cache configuration, a streaming bandwidth
//! probe, and the roofline model
//!
//! All machine-dependent figures live in an explicit `HardwareProfile`
//! value that is constructed once and passed to the code that needs it.
//! Cache sizes, the nominal frequency, and the peak compute rate are
//! configuration inputs with conservative defaults; only the memory
//! bandwidth is measured.

use std::fmt;
use std::time::Instant;

use tracing::info;

use crate::constants::{
    BANDWIDTH_BUFFER_BYTES, BANDWIDTH_REPETITIONS, DEFAULT_CPU_FREQ_GHZ, DEFAULT_L1_CACHE_SIZE,
    DEFAULT_L2_CACHE_SIZE, DEFAULT_L3_CACHE_SIZE, DEFAULT_PEAK_GFLOPS,
};

/// Per-level cache capacities in bytes
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub l1_bytes: usize,
    pub l2_bytes: usize,
    pub l3_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            l1_bytes: DEFAULT_L1_CACHE_SIZE,
            l2_bytes: DEFAULT_L2_CACHE_SIZE,
            l3_bytes: DEFAULT_L3_CACHE_SIZE,
        }
    }
}

/// Memory-hierarchy level a working set resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLevel {
    L1,
    L2,
    L3,
    Dram,
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CacheLevel::L1 => "L1",
            CacheLevel::L2 => "L2",
            CacheLevel::L3 => "L3",
            CacheLevel::Dram => "DRAM",
        };
        write!(f, "{}", tag)
    }
}

/// Classifies a working-set size against the cache hierarchy
pub fn classify_working_set(bytes: usize, caches: &CacheConfig) -> CacheLevel {
    if bytes <= caches.l1_bytes {
        CacheLevel::L1
    } else if bytes <= caches.l2_bytes {
        CacheLevel::L2
    } else if bytes <= caches.l3_bytes {
        CacheLevel::L3
    } else {
        CacheLevel::Dram
    }
}

/// Roofline performance model: attainable GFLOP/s as a function of
/// arithmetic intensity
#[derive(Debug, Clone, Copy)]
pub struct RooflineModel {
    /// Compute ceiling in GFLOP/s
    pub peak_gflops: f64,
    /// Memory ceiling in GB/s
    pub memory_bandwidth_gbs: f64,
}

impl RooflineModel {
    /// Attainable GFLOP/s at the given arithmetic intensity (FLOP/byte)
    pub fn ceiling(&self, arithmetic_intensity: f64) -> f64 {
        self.peak_gflops
            .min(self.memory_bandwidth_gbs * arithmetic_intensity)
    }

    /// Intensity at which the model transitions from memory-bound to
    /// compute-bound
    pub fn ridge_point(&self) -> f64 {
        self.peak_gflops / self.memory_bandwidth_gbs
    }
}

/// Explicit machine description consumed by the engine and the
/// experiment battery
#[derive(Debug, Clone)]
pub struct HardwareProfile {
    pub caches: CacheConfig,
    /// Nominal frequency in GHz used to express time as cycle estimates
    pub cpu_freq_ghz: f64,
    /// Compute ceiling in GFLOP/s for the roofline model
    pub peak_gflops: f64,
    /// Measured streaming bandwidth in GB/s
    pub memory_bandwidth_gbs: f64,
}

impl HardwareProfile {
    /// Builds a profile with default cache/frequency/peak figures and a
    /// measured streaming bandwidth
    pub fn characterize() -> Self {
        Self::with_config(
            CacheConfig::default(),
            DEFAULT_CPU_FREQ_GHZ,
            DEFAULT_PEAK_GFLOPS,
            BANDWIDTH_BUFFER_BYTES,
        )
    }

    /// Builds a profile from explicit figures; the probe buffer size is
    /// a parameter so tests can use a small working set
    pub fn with_config(
        caches: CacheConfig,
        cpu_freq_ghz: f64,
        peak_gflops: f64,
        probe_bytes: usize,
    ) -> Self {
        let memory_bandwidth_gbs = measure_stream_bandwidth(probe_bytes);
        info!(
            bandwidth_gbs = format!("{:.1}", memory_bandwidth_gbs).as_str(),
            cpu_freq_ghz, peak_gflops, "hardware profile ready"
        );

        Self {
            caches,
            cpu_freq_ghz,
            peak_gflops,
            memory_bandwidth_gbs,
        }
    }

    /// The roofline model induced by this profile
    pub fn roofline(&self) -> RooflineModel {
        RooflineModel {
            peak_gflops: self.peak_gflops,
            memory_bandwidth_gbs: self.memory_bandwidth_gbs,
        }
    }
}

/// Measures sustained memory bandwidth with a three-stream add,
/// `a[i] = b[i] + c[i]`, over buffers sized to defeat the caches
///
/// Returns GB/s from the best of several repetitions; the first pass
/// pays the first-touch cost and is rarely the one kept.
pub fn measure_stream_bandwidth(total_bytes: usize) -> f64 {
    let len = (total_bytes / std::mem::size_of::<f32>() / 3).max(1);

    let mut a = vec![0.0f32; len];
    let b = vec![1.0f32; len];
    let c = vec![2.0f32; len];

    let bytes_moved = (3 * len * std::mem::size_of::<f32>()) as f64;
    let mut best_gbs = 0.0f64;

    for _ in 0..BANDWIDTH_REPETITIONS {
        let start = Instant::now();
        for i in 0..len {
            a[i] = b[i] + c[i];
        }
        std::hint::black_box(&a);
        let elapsed = start.elapsed().as_secs_f64();

        if elapsed > 0.0 {
            best_gbs = best_gbs.max(bytes_moved / elapsed / 1e9);
        }
    }

    best_gbs
}

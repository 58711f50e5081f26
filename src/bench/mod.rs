//! Benchmark engine: experiment configuration, timing, hardware
//! characterization, and CSV reporting

pub mod config;
pub mod engine;
pub mod experiments;
pub mod hardware;
pub mod report;

pub use config::{ExperimentConfig, SweepParams, TrialOptions};
pub use engine::{run_experiment, ExperimentResult};
pub use hardware::{CacheConfig, CacheLevel, HardwareProfile, RooflineModel};
pub use report::save_results_csv;

//! Engine-level behavior: exact work counters, metric sanity, failure
//! isolation, and configuration-time kernel rejection

use matbench::bench::{
    run_experiment, CacheConfig, ExperimentConfig, HardwareProfile, TrialOptions,
};
use matbench::kernels::{Implementation, KernelType};
use matbench::BenchError;

fn profile() -> HardwareProfile {
    // Small probe buffer keeps characterization out of the test's budget
    HardwareProfile::with_config(CacheConfig::default(), 3.0, 80.0, 3 * 1024 * 1024)
}

fn single_trial() -> TrialOptions {
    TrialOptions {
        warmup: 0,
        iterations: 1,
    }
}

#[test]
fn dense_512_reports_exact_flops() {
    let config = ExperimentConfig::square(
        512,
        0.0,
        1,
        KernelType::Dense,
        Implementation::Scalar,
    );
    let result = run_experiment(&config, single_trial(), &profile()).unwrap();

    // Independent of measured timing
    assert_eq!(result.flops, 2 * 512 * 512 * 512);
    assert_eq!(result.flops, 268_435_456);
}

#[test]
fn successful_trial_yields_positive_finite_throughput() {
    let config =
        ExperimentConfig::square(64, 0.1, 1, KernelType::Csr, Implementation::Simd);
    let result = run_experiment(&config, TrialOptions::default(), &profile()).unwrap();

    assert!(result.time_seconds > 0.0);
    assert!(result.gflops > 0.0 && result.gflops.is_finite());
    assert!(result.cpnz > 0.0 && result.cpnz.is_finite());
    assert!(result.arithmetic_intensity > 0.0);
}

#[test]
fn unsupported_combination_rejected_before_any_work() {
    let config =
        ExperimentConfig::square(64, 0.1, 1, KernelType::Csc, Implementation::Optimized);
    let err = run_experiment(&config, single_trial(), &profile()).unwrap_err();

    match err {
        BenchError::UnsupportedKernel {
            kernel,
            implementation,
        } => {
            assert_eq!(kernel, KernelType::Csc);
            assert_eq!(implementation, Implementation::Optimized);
        }
        other => panic!("expected UnsupportedKernel, got {}", other),
    }
}

#[test]
fn failed_configuration_does_not_abort_the_sweep() {
    let hw = profile();

    // A zero tile panics inside the tiled kernel; the row comes back
    // zeroed instead of propagating the panic
    let broken = ExperimentConfig {
        m: 16,
        k: 16,
        n: 16,
        sparsity: 0.0,
        threads: 1,
        kernel_type: KernelType::Dense,
        implementation: Implementation::Tiled,
        tile_size: 0,
    };
    let failed = run_experiment(&broken, single_trial(), &hw).unwrap();
    assert_eq!(failed.time_seconds, 0.0);
    assert_eq!(failed.gflops, 0.0);
    assert_eq!(failed.flops, 2 * 16 * 16 * 16);

    // The next configuration still runs normally
    let next =
        ExperimentConfig::square(16, 0.0, 1, KernelType::Dense, Implementation::Simd);
    let ok = run_experiment(&next, single_trial(), &hw).unwrap();
    assert!(ok.time_seconds > 0.0);
}

#[test]
fn threaded_experiment_honors_requested_pool() {
    for threads in [1, 2] {
        let config = ExperimentConfig::square(
            48,
            0.2,
            threads,
            KernelType::Csr,
            Implementation::SimdThreaded,
        );
        let result = run_experiment(&config, single_trial(), &profile()).unwrap();
        assert_eq!(result.threads, threads);
        assert!(result.gflops > 0.0);
    }
}

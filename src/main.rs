//! Command-line entry point: characterizes the host, then runs the full
//! experiment battery with default sweep parameters, writing one CSV
//! per experiment under `results/`.

use std::path::Path;

use tracing::info;

use matbench::bench::{experiments, HardwareProfile, SweepParams};

fn main() -> matbench::Result<()> {
    tracing_subscriber::fmt().init();

    info!(version = matbench::VERSION, "matbench starting");

    let cores = num_cpus::get();
    let mut params = SweepParams::default();
    params.thread_counts.retain(|&t| t <= cores);
    info!(cores, thread_counts = ?params.thread_counts, "sweep parameters");

    let hw = HardwareProfile::characterize();

    let out_dir = Path::new("results");
    std::fs::create_dir_all(out_dir)?;

    experiments::run_full_battery(&hw, &params, out_dir)?;

    info!("all experiments complete");
    Ok(())
}

//! CSV serialization of experiment results
//!
//! The column set is a stable external interface: downstream analysis
//! scripts key on these exact headers, so the schema never varies with
//! the experiment that produced the rows.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::bench::engine::ExperimentResult;
use crate::error::Result;

/// Fixed CSV header emitted for every result file
pub const CSV_HEADER: &str =
    "kernel_type,implementation,size,sparsity,threads,time_seconds,gflops,cpnz,flops,bytes_accessed,arithmetic_intensity";

fn format_row(r: &ExperimentResult) -> String {
    format!(
        "{},{},{},{},{},{:.9},{:.6},{:.3},{},{},{:.6}",
        r.kernel_type,
        r.implementation,
        r.size,
        r.sparsity,
        r.threads,
        r.time_seconds,
        r.gflops,
        r.cpnz,
        r.flops,
        r.bytes_accessed,
        r.arithmetic_intensity,
    )
}

/// Writes results to `path` as CSV, header first, one row per experiment
pub fn save_results_csv<P: AsRef<Path>>(path: P, results: &[ExperimentResult]) -> Result<()> {
    let mut out = String::with_capacity(64 * (results.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for result in results {
        out.push_str(&format_row(result));
        out.push('\n');
    }

    fs::write(path.as_ref(), out)?;
    info!(
        path = %path.as_ref().display(),
        rows = results.len(),
        "results written"
    );

    Ok(())
}

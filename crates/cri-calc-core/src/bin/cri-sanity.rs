//! Run the dosing engine self-test from the command line.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::bail;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let report = cri_calc_core::sanity::sanity_report();
    let failed = report.iter().filter(|c| !c.passed).count();

    for check in &report {
        let mark = if check.passed { "ok  " } else { "FAIL" };
        if check.detail.is_empty() || check.passed {
            println!("{} {}", mark, check.name);
        } else {
            println!("{} {} ({})", mark, check.name, check.detail);
        }
    }

    if !cri_calc_core::run_sanity_checks() {
        bail!("{} of {} sanity checks failed", failed, report.len());
    }
    println!("{} checks passed", report.len());
    Ok(())
}

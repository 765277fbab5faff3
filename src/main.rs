//! Level Generator Sweep - launch the evolutionary generator across a parameter grid
//!
//! Expands the configured parameter lists into every combination, launches the
//! external generator once per execution of each with seeds drawn from a fixed
//! stream, and records what was launched next to the generator's results.
//!
//! Usage:
//!   cargo run --bin mapsweep -- --help
//!   cargo run --bin mapsweep -- --dry-run
//!   cargo run --bin mapsweep -- --settings sweep.json --master-seed 42

use mapsweep::sweep::{SweepConfig, run_sweep};

fn main() {
    let config = SweepConfig::from_args();

    match run_sweep(&config) {
        Ok(summary) => {
            let path = summary.default_path();
            if let Err(e) = summary.write_to_file(&path) {
                eprintln!("Failed to write sweep summary {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!(
                "Sweep complete: {} runs. Summary written to {}",
                summary.total_runs,
                path.display()
            );
        }
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}

//! Mapsweep - experiment tooling around an evolutionary dungeon level generator
//!
//! This crate drives the external generator across a parameter grid and turns
//! its per-execution result files into annotated heatmaps and summary
//! statistics.

// Core modules
pub mod axes;
pub mod constants;
pub mod grid;
pub mod render;
pub mod results;
pub mod summary;
pub mod sweep;

// Re-export commonly used types for convenience
pub use axes::{AXES_FILE, BucketAxis, GridAxes};
pub use constants::*;
pub use grid::{BucketGrid, aggregate, build_grid};
pub use render::{load_font, render_heatmap, value_to_color};
pub use results::{
    ExecutionResults, LevelRecord, RunData, load_execution_dir, parse_execution_files,
    parse_level_filename, parse_level_record,
};
pub use summary::{DurationSummary, MeanStdTable};
pub use sweep::{Configuration, RunRecord, SweepConfig, SweepSummary, run_sweep};

// =============================================================================
// SAMPLE STATISTICS (shared by cell aggregation and the duration summary)
// =============================================================================

/// Mean of a sample, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a sample, 0.0 for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let center = mean(values);
    let variance =
        values.iter().map(|v| (v - center).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

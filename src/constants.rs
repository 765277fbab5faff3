//! Shared conventions for the level-generator experiment pipeline
//!
//! Directory layout, result-file naming, and the fixed level parameters
//! forwarded to the external generator live here so the sweep, charts, and
//! stats tools cannot drift apart.

// =============================================================================
// DIRECTORY LAYOUT
// =============================================================================

/// Where the external generator writes its output, one subdirectory per
/// configuration, one numbered subdirectory per execution.
pub const RESULTS_DIR: &str = "results";
/// Where the charts tool writes heatmaps, mirroring the results layout.
pub const CHARTS_DIR: &str = "charts";

// =============================================================================
// RESULT FILE NAMING
// =============================================================================

/// Level files are named `level-<exploration>-<leniency>.json`.
pub const LEVEL_FILE_PREFIX: &str = "level";
pub const FILENAME_SEPARATOR: char = '-';
pub const JSON_EXTENSION: &str = ".json";

/// Per-execution generator metadata (carries the run duration).
pub const DATA_FILENAME: &str = "data.json";
/// Per-configuration duration summary written by the charts tool.
pub const DURATION_SUMMARY_FILENAME: &str = "duration.json";

// =============================================================================
// FIXED GENERATOR PARAMETERS
// =============================================================================

// The experiment sweeps time budget, population, mutation, and competitors;
// the level shape itself stays fixed across every run.

pub const DEFAULT_ROOMS: u32 = 20;
pub const DEFAULT_KEYS: u32 = 4;
pub const DEFAULT_LOCKS: u32 = 4;
pub const DEFAULT_ENEMIES: u32 = 30;
pub const DEFAULT_LINEAR_COEFFICIENT: f64 = 1.7;

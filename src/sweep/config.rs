//! Sweep configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ENEMIES, DEFAULT_KEYS, DEFAULT_LINEAR_COEFFICIENT, DEFAULT_LOCKS, DEFAULT_ROOMS,
};

/// Template sweep settings (checked into git)
pub const SWEEP_SETTINGS_TEMPLATE: &str = "config/sweep_settings.template.json";
/// Local sweep settings (gitignored, user's custom settings)
pub const SWEEP_SETTINGS_FILE: &str = "config/sweep_settings.json";

/// Configuration for a generator parameter sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Path to the generator executable, None = platform default
    #[serde(default)]
    pub generator: Option<String>,
    /// Executions of each parameter configuration
    #[serde(default = "default_executions")]
    pub executions: usize,
    /// Evolution time budgets to sweep
    #[serde(default = "default_time_budgets")]
    pub time_budgets: Vec<u32>,
    /// Initial population sizes to sweep
    #[serde(default = "default_populations")]
    pub populations: Vec<u32>,
    /// Mutation rates to sweep
    #[serde(default = "default_mutations")]
    pub mutations: Vec<u32>,
    /// Competitor counts to sweep
    #[serde(default = "default_competitors")]
    pub competitors: Vec<u32>,
    /// Rooms per generated dungeon
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    /// Keys per generated dungeon
    #[serde(default = "default_keys")]
    pub keys: u32,
    /// Locks per generated dungeon
    #[serde(default = "default_locks")]
    pub locks: u32,
    /// Enemies per generated dungeon
    #[serde(default = "default_enemies")]
    pub enemies: u32,
    /// Linearity coefficient forwarded to the generator
    #[serde(default = "default_linear_coefficient")]
    pub linear_coefficient: f64,
    /// Seed for the stream of per-run generator seeds
    #[serde(default)]
    pub master_seed: u64,
    /// Print the planned runs without launching the generator
    #[serde(default)]
    pub dry_run: bool,
}

fn default_executions() -> usize {
    10
}

fn default_time_budgets() -> Vec<u32> {
    vec![100, 200, 300]
}

fn default_populations() -> Vec<u32> {
    vec![15, 20, 25]
}

fn default_mutations() -> Vec<u32> {
    vec![5]
}

fn default_competitors() -> Vec<u32> {
    vec![3]
}

fn default_rooms() -> u32 {
    DEFAULT_ROOMS
}

fn default_keys() -> u32 {
    DEFAULT_KEYS
}

fn default_locks() -> u32 {
    DEFAULT_LOCKS
}

fn default_enemies() -> u32 {
    DEFAULT_ENEMIES
}

fn default_linear_coefficient() -> f64 {
    DEFAULT_LINEAR_COEFFICIENT
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            generator: None, // Resolved per platform at launch time
            executions: default_executions(),
            time_budgets: default_time_budgets(),
            populations: default_populations(),
            mutations: default_mutations(),
            competitors: default_competitors(),
            rooms: default_rooms(),
            keys: default_keys(),
            locks: default_locks(),
            enemies: default_enemies(),
            linear_coefficient: default_linear_coefficient(),
            master_seed: 0,
            dry_run: false,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Load configuration from default config files
    /// Priority: local settings > template settings > built-in defaults
    pub fn from_config_files() -> Self {
        // Try local settings first
        if let Ok(config) = Self::from_file(SWEEP_SETTINGS_FILE) {
            return config;
        }
        // Fall back to template settings
        if let Ok(config) = Self::from_file(SWEEP_SETTINGS_TEMPLATE) {
            return config;
        }
        // Fall back to built-in defaults
        Self::default()
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        // Start with config files as base
        let mut config = Self::from_config_files();

        // Check for explicit settings file override
        let mut i = 1;
        while i < args.len() {
            if args[i] == "--settings" && i + 1 < args.len() {
                match Self::from_file(&args[i + 1]) {
                    Ok(loaded) => config = loaded,
                    Err(e) => {
                        eprintln!("Warning: {}", e);
                    }
                }
                break;
            }
            i += 1;
        }

        // Then apply command line overrides
        i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--settings" => {
                    // Already handled above
                    i += 1;
                }
                "--generator" => {
                    if i + 1 < args.len() {
                        config.generator = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--executions" => {
                    if i + 1 < args.len() {
                        config.executions = args[i + 1].parse().unwrap_or(config.executions);
                        i += 1;
                    }
                }
                "--master-seed" => {
                    if i + 1 < args.len() {
                        config.master_seed = args[i + 1].parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--dry-run" => {
                    config.dry_run = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Level Generator Sweep - run the evolutionary generator across a parameter grid

USAGE:
    cargo run --bin mapsweep -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --generator <PATH>  Path to the generator executable (default: per-platform publish dir)
    --executions <N>    Executions of each parameter configuration (default: 10)
    --master-seed <N>   Seed for the per-run seed stream (default: 0)
    --dry-run           Print the planned runs without launching the generator
    --help, -h          Show this help

EXAMPLES:
    # Full sweep with the default parameter grid
    cargo run --bin mapsweep

    # Preview what a custom sweep would launch
    cargo run --bin mapsweep -- --settings sweep.json --dry-run

    # Reproduce a sweep exactly
    cargo run --bin mapsweep -- --master-seed 42

SETTINGS FILE FORMAT (JSON):
    {{
      "time_budgets": [100, 200, 300],
      "populations": [15, 20, 25],
      "mutations": [5],
      "competitors": [3],
      "executions": 10
    }}

The generator writes results/<time>-<population>-<mutation>-<competitors>/<execution>/
on its own; this tool only launches it and records what was launched."#
    );
}

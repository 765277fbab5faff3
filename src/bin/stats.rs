//! Stats Tool - aggregate one attribute across a configuration's executions
//!
//! Reads every execution of one parameter configuration, builds the per
//! execution bucket grids for an attribute, and prints the cell-wise
//! mean +- population standard deviation as an aligned table. Cells no
//! execution ever filled stay blank instead of contributing zeros.
//!
//! Usage:
//!   cargo run --bin stats -- 100 15 5 3 10
//!   cargo run --bin stats -- 100 15 5 3 10 --attribute generation
//!   cargo run --bin stats -- 100 15 5 3 10 --csv fitness.csv

use std::path::PathBuf;
use std::process::exit;

use mapsweep::axes::GridAxes;
use mapsweep::constants::RESULTS_DIR;
use mapsweep::grid::{aggregate, build_grid};
use mapsweep::results::load_execution_dir;
use mapsweep::summary::MeanStdTable;

fn main() {
    let config = StatsConfig::from_args();

    if config.show_help {
        print_help();
        return;
    }

    let (basename, executions) = match (config.basename(), config.executions()) {
        (Some(basename), Some(executions)) => (basename, executions),
        _ => {
            eprintln!(
                "Expected <time> <population> <mutation> <competitors> <executions>; see --help"
            );
            exit(1);
        }
    };

    let axes = match &config.axes_file {
        Some(path) => match GridAxes::from_file(path) {
            Ok(axes) => axes,
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        },
        None => GridAxes::from_config_files(),
    };

    let mut grids = Vec::with_capacity(executions);
    for execution in 0..executions {
        let source = config
            .results_dir
            .join(&basename)
            .join(execution.to_string());
        let results = match load_execution_dir(&source, &axes) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        };
        match build_grid(&results.records, &config.attribute, &axes) {
            Ok(grid) => grids.push(grid),
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        }
    }

    let (mean_grid, std_grid) = match aggregate(&grids) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    let table = match MeanStdTable::from_grids(&mean_grid, &std_grid, &axes) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    println!(
        "{} across {} executions of {}",
        config.attribute, executions, basename
    );
    println!("{}", table.format_table());

    if let Some(csv_path) = &config.csv_file {
        if let Err(e) = table.write_csv(csv_path) {
            eprintln!("Failed to write {}: {}", csv_path.display(), e);
            exit(1);
        }
        println!("Saved {}", csv_path.display());
    }
}

/// Configuration for the stats tool
struct StatsConfig {
    /// The four sweep parameters followed by the execution count
    positionals: Vec<String>,
    attribute: String,
    axes_file: Option<String>,
    csv_file: Option<PathBuf>,
    results_dir: PathBuf,
    show_help: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            positionals: Vec::new(),
            attribute: "fitness".to_string(),
            axes_file: None,
            csv_file: None,
            results_dir: PathBuf::from(RESULTS_DIR),
            show_help: false,
        }
    }
}

impl StatsConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--attribute" => {
                    if i + 1 < args.len() {
                        config.attribute = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--axes" => {
                    if i + 1 < args.len() {
                        config.axes_file = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--csv" => {
                    if i + 1 < args.len() {
                        config.csv_file = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--results-dir" => {
                    if i + 1 < args.len() {
                        config.results_dir = PathBuf::from(&args[i + 1]);
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    config.show_help = true;
                }
                arg if !arg.starts_with('-') => {
                    config.positionals.push(arg.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        config
    }

    /// Configuration directory basename from the four parameter arguments
    fn basename(&self) -> Option<String> {
        if self.positionals.len() != 5 {
            return None;
        }
        Some(self.positionals[..4].join("-"))
    }

    fn executions(&self) -> Option<usize> {
        self.positionals.get(4)?.parse().ok()
    }
}

fn print_help() {
    println!(
        r#"Stats Tool - aggregate one attribute across a configuration's executions

USAGE:
    cargo run --bin stats -- <TIME> <POPULATION> <MUTATION> <COMPETITORS> <EXECUTIONS> [OPTIONS]

ARGUMENTS:
    TIME POPULATION MUTATION COMPETITORS
                        The swept parameters naming results/<time>-<population>-<mutation>-<competitors>/
    EXECUTIONS          How many executions of that configuration to aggregate

OPTIONS:
    --attribute <NAME>  Level attribute to aggregate (default: fitness)
    --axes <FILE>       Load bucket axes from TOML file (default: config/axes.toml)
    --csv <FILE>        Also write the table as CSV
    --results-dir <DIR> Where the generator wrote its results (default: results)
    --help, -h          Show this help

EXAMPLES:
    # Mean +- std of fitness across all 10 executions of 100-15-5-3
    cargo run --bin stats -- 100 15 5 3 10

    # Same for the generation counter, exported as CSV
    cargo run --bin stats -- 100 15 5 3 10 --attribute generation --csv generation.csv"#
    );
}

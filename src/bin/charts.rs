//! Charts Tool - render heatmaps for one sweep configuration
//!
//! Reads the generator's result files for every execution of one parameter
//! configuration, renders one annotated heatmap per attribute per execution,
//! and writes the duration summary across all executions.
//!
//! Usage:
//!   cargo run --bin charts -- 100 15 5 3 10
//!   cargo run --bin charts -- 100 15 5 3 10 --attributes fitness
//!   cargo run --bin charts -- 100 15 5 3 10 --font /usr/share/fonts/TTF/DejaVuSans.ttf
//!
//! Outputs land in charts/<basename>/ as:
//!   <execution>/<attribute>.png
//!   duration.json

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use mapsweep::axes::GridAxes;
use mapsweep::constants::{CHARTS_DIR, DURATION_SUMMARY_FILENAME, RESULTS_DIR};
use mapsweep::grid::build_grid;
use mapsweep::render::{load_font, render_heatmap};
use mapsweep::results::load_execution_dir;
use mapsweep::summary::DurationSummary;

fn main() {
    let config = ChartsConfig::from_args();

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

    let font = match load_font(config.font.as_deref()) {
        Ok(font) => font,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    let target = config.charts_dir.join(&basename);
    let mut durations = Vec::with_capacity(executions);

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
        durations.push(results.run.duration);

        let target_ex = target.join(execution.to_string());
        if let Err(e) = fs::create_dir_all(&target_ex) {
            eprintln!(
                "Failed to create chart directory {}: {}",
                target_ex.display(),
                e
            );
            exit(1);
        }

        for attribute in &config.attributes {
            let grid = match build_grid(&results.records, attribute, &axes) {
                Ok(grid) => grid,
                Err(e) => {
                    eprintln!("{}", e);
                    exit(1);
                }
            };

            let path = target_ex.join(format!("{}.png", attribute));
            let title = format!("{} {} execution {}", attribute, basename, execution);
            if let Err(e) = render_heatmap(&grid, &axes, grid.max_value(), &font, &path, &title) {
                eprintln!("{}", e);
                exit(1);
            }
            println!("Saved {}", path.display());
        }
    }

    let summary = match DurationSummary::from_durations(&durations) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    let duration_path = target.join(DURATION_SUMMARY_FILENAME);
    if let Err(e) = summary.write_to_file(&duration_path) {
        eprintln!("Failed to write {}: {}", duration_path.display(), e);
        exit(1);
    }
    println!("Saved {}", duration_path.display());
}

/// Configuration for the charts tool
struct ChartsConfig {
    /// The four sweep parameters followed by the execution count
    positionals: Vec<String>,
    attributes: Vec<String>,
    axes_file: Option<String>,
    font: Option<String>,
    results_dir: PathBuf,
    charts_dir: PathBuf,
    show_help: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            positionals: Vec::new(),
            attributes: vec!["fitness".to_string(), "generation".to_string()],
            axes_file: None,
            font: None,
            results_dir: PathBuf::from(RESULTS_DIR),
            charts_dir: PathBuf::from(CHARTS_DIR),
            show_help: false,
        }
    }
}

impl ChartsConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--attributes" => {
                    if i + 1 < args.len() {
                        config.attributes = args[i + 1]
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                        i += 1;
                    }
                }
                "--axes" => {
                    if i + 1 < args.len() {
                        config.axes_file = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--font" => {
                    if i + 1 < args.len() {
                        config.font = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--results-dir" => {
                    if i + 1 < args.len() {
                        config.results_dir = PathBuf::from(&args[i + 1]);
                        i += 1;
                    }
                }
                "--charts-dir" => {
                    if i + 1 < args.len() {
                        config.charts_dir = PathBuf::from(&args[i + 1]);
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
        r#"Charts Tool - render heatmaps for one sweep configuration

USAGE:
    cargo run --bin charts -- <TIME> <POPULATION> <MUTATION> <COMPETITORS> <EXECUTIONS> [OPTIONS]

ARGUMENTS:
    TIME POPULATION MUTATION COMPETITORS
                        The swept parameters naming results/<time>-<population>-<mutation>-<competitors>/
    EXECUTIONS          How many executions of that configuration to chart

OPTIONS:
    --attributes <LIST> Comma-separated level attributes to chart (default: fitness,generation)
    --axes <FILE>       Load bucket axes from TOML file (default: config/axes.toml)
    --font <FILE>       Annotation font (default: first usable system font)
    --results-dir <DIR> Where the generator wrote its results (default: results)
    --charts-dir <DIR>  Where to write the charts (default: charts)
    --help, -h          Show this help

EXAMPLES:
    # Chart fitness and generation for all 10 executions of 100-15-5-3
    cargo run --bin charts -- 100 15 5 3 10

    # Only the fitness heatmaps
    cargo run --bin charts -- 100 15 5 3 10 --attributes fitness"#
    );
}

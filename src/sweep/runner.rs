//! Sweep runner
//!
//! Expands the parameter grid, draws one generator seed per run from a
//! seeded stream, and launches the generator sequentially. The generator
//! owns its output layout; this runner only records what it launched.

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::constants::RESULTS_DIR;
use crate::sweep::config::SweepConfig;

/// One point of the swept parameter grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Evolution time budget
    pub time_budget: u32,
    /// Initial population size
    pub population: u32,
    /// Mutation rate
    pub mutation: u32,
    /// Number of competitors
    pub competitors: u32,
}

impl Configuration {
    /// Directory basename the generator derives from these parameters
    pub fn basename(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.time_budget, self.population, self.mutation, self.competitors
        )
    }

    /// Full generator argument list for one run, in the order the generator
    /// expects them
    pub fn generator_args(&self, seed: i32, config: &SweepConfig) -> Vec<String> {
        vec![
            seed.to_string(),
            self.time_budget.to_string(),
            self.population.to_string(),
            self.mutation.to_string(),
            self.competitors.to_string(),
            config.rooms.to_string(),
            config.keys.to_string(),
            config.locks.to_string(),
            config.enemies.to_string(),
            config.linear_coefficient.to_string(),
        ]
    }
}

/// Record of one generator launch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub configuration: Configuration,
    /// Execution counter within the configuration, 0-based
    pub execution: usize,
    /// Seed passed to the generator
    pub seed: i32,
}

/// Everything a finished sweep launched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub session_id: String,
    /// Generator executable the runs were launched with
    pub generator: String,
    pub master_seed: u64,
    pub executions: usize,
    pub total_runs: usize,
    pub elapsed_secs: f64,
    pub runs: Vec<RunRecord>,
}

impl SweepSummary {
    /// Write summary to JSON file
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Default location for the summary, next to the generator's results
    pub fn default_path(&self) -> PathBuf {
        Path::new(RESULTS_DIR).join(format!("{}.json", self.session_id))
    }
}

/// Expand the configured parameter lists into the full Cartesian product.
/// Time budget is the slowest axis, competitors the fastest.
pub fn configurations(config: &SweepConfig) -> Vec<Configuration> {
    let mut result = Vec::new();
    for &time_budget in &config.time_budgets {
        for &population in &config.populations {
            for &mutation in &config.mutations {
                for &competitors in &config.competitors {
                    result.push(Configuration {
                        time_budget,
                        population,
                        mutation,
                        competitors,
                    });
                }
            }
        }
    }
    result
}

/// Platform default for the generator executable's publish location
pub fn default_generator_path() -> Result<String, String> {
    if cfg!(target_os = "linux") {
        Ok("./bin/Debug/net5.0/publish/LevelGenerator".to_string())
    } else if cfg!(target_os = "windows") {
        Ok("bin\\Debug\\net5.0\\publish\\LevelGenerator.exe".to_string())
    } else {
        Err("No default generator path for this platform; pass --generator <PATH>".to_string())
    }
}

/// Run the full sweep: every execution of every configuration, sequentially,
/// aborting on the first generator failure.
///
/// The per-run seeds come from a fixed-seed stream, so a sweep with the same
/// settings and master seed launches identical generator runs.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepSummary, String> {
    let generator = match &config.generator {
        Some(path) => path.clone(),
        None => default_generator_path()?,
    };

    let grid = configurations(config);
    if grid.is_empty() {
        return Err("No configurations to run; every parameter list must be non-empty".to_string());
    }
    if config.executions == 0 {
        return Err("No executions configured".to_string());
    }

    let total_runs = grid.len() * config.executions;
    let session_id = format!("sweep_{}", Local::now().format("%Y%m%d_%H%M%S"));

    println!(
        "Sweep {}: {} configurations x {} executions = {} runs",
        session_id,
        grid.len(),
        config.executions,
        total_runs
    );
    if config.dry_run {
        println!("Dry run: printing generator command lines without launching");
    }

    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.master_seed);
    let mut runs = Vec::with_capacity(total_runs);
    let mut launched = 0;

    for configuration in &grid {
        for execution in 0..config.executions {
            // Same draw order as the grid order, so seeds are reproducible
            let seed: i32 = rng.gen_range(0..i32::MAX);
            let args = configuration.generator_args(seed, config);
            launched += 1;

            println!(
                "[{}/{} {:.2}%] {} execution {} seed {}",
                launched,
                total_runs,
                launched as f64 / total_runs as f64 * 100.0,
                configuration.basename(),
                execution,
                seed
            );

            if config.dry_run {
                println!("    {} {}", generator, args.join(" "));
            } else {
                let status = Command::new(&generator)
                    .args(&args)
                    .status()
                    .map_err(|e| format!("Failed to launch generator {}: {}", generator, e))?;
                if !status.success() {
                    return Err(format!(
                        "Generator exited with {} for configuration {} (seed {})",
                        status,
                        configuration.basename(),
                        seed
                    ));
                }
            }

            runs.push(RunRecord {
                configuration: configuration.clone(),
                execution,
                seed,
            });
        }
    }

    let elapsed_secs = started.elapsed().as_secs_f64();
    println!();
    println!(
        "Sweep {} finished: {} runs in {:.1}s",
        session_id, total_runs, elapsed_secs
    );

    Ok(SweepSummary {
        session_id,
        generator,
        master_seed: config.master_seed,
        executions: config.executions,
        total_runs,
        elapsed_secs,
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_product_order() {
        let config = SweepConfig {
            time_budgets: vec![100, 200],
            populations: vec![15, 20],
            mutations: vec![5],
            competitors: vec![3],
            ..SweepConfig::default()
        };

        let grid = configurations(&config);
        let basenames: Vec<String> = grid.iter().map(|c| c.basename()).collect();

        assert_eq!(
            basenames,
            vec!["100-15-5-3", "100-20-5-3", "200-15-5-3", "200-20-5-3"]
        );
    }

    #[test]
    fn test_empty_axis_empties_the_grid() {
        let config = SweepConfig {
            populations: Vec::new(),
            ..SweepConfig::default()
        };

        assert!(configurations(&config).is_empty());
    }

    #[test]
    fn test_generator_args_order() {
        let config = SweepConfig::default();
        let configuration = Configuration {
            time_budget: 60,
            population: 20,
            mutation: 5,
            competitors: 3,
        };

        let args = configuration.generator_args(12345, &config);

        assert_eq!(
            args,
            vec!["12345", "60", "20", "5", "3", "20", "4", "4", "30", "1.7"]
        );
    }

    #[test]
    fn test_seed_stream_is_reproducible() {
        let mut first = StdRng::seed_from_u64(0);
        let mut second = StdRng::seed_from_u64(0);

        let a: Vec<i32> = (0..5).map(|_| first.gen_range(0..i32::MAX)).collect();
        let b: Vec<i32> = (0..5).map(|_| second.gen_range(0..i32::MAX)).collect();

        assert_eq!(a, b);
        assert!(a.iter().all(|&s| s >= 0));
    }

    #[test]
    fn test_dry_run_records_every_planned_run() {
        let config = SweepConfig {
            generator: Some("does-not-need-to-exist".to_string()),
            executions: 2,
            time_budgets: vec![100],
            populations: vec![15, 20],
            mutations: vec![5],
            competitors: vec![3],
            dry_run: true,
            ..SweepConfig::default()
        };

        let summary = run_sweep(&config).unwrap();

        assert_eq!(summary.total_runs, 4);
        assert_eq!(summary.runs.len(), 4);
        assert_eq!(summary.runs[0].configuration.basename(), "100-15-5-3");
        assert_eq!(summary.runs[0].execution, 0);
        assert_eq!(summary.runs[1].execution, 1);
    }

    #[test]
    fn test_sweep_summary_round_trips_as_json() {
        let config = SweepConfig {
            generator: Some("generator".to_string()),
            executions: 1,
            time_budgets: vec![100],
            populations: vec![15],
            mutations: vec![5],
            competitors: vec![3],
            dry_run: true,
            ..SweepConfig::default()
        };

        let summary = run_sweep(&config).unwrap();
        let json = serde_json::to_string_pretty(&summary).unwrap();
        let back: SweepSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(back.session_id, summary.session_id);
        assert_eq!(back.generator, "generator");
        assert_eq!(back.total_runs, 1);
        assert_eq!(back.runs[0].seed, summary.runs[0].seed);
    }

    #[test]
    fn test_empty_parameter_list_is_fatal() {
        let config = SweepConfig {
            generator: Some("unused".to_string()),
            time_budgets: Vec::new(),
            dry_run: true,
            ..SweepConfig::default()
        };

        assert!(run_sweep(&config).is_err());
    }
}

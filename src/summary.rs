//! Duration summaries and mean±std reporting
//!
//! The charts tool writes one `duration.json` per configuration; the stats
//! tool merges the cross-execution mean and std grids into a
//! `mean+-std` table for the console or a CSV file.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::axes::GridAxes;
use crate::grid::BucketGrid;
use crate::{mean, population_std};

/// Mean and population standard deviation of the per-execution run
/// durations, serialized as `{ "mean": ..., "std": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationSummary {
    pub mean: f64,
    pub std: f64,
}

impl DurationSummary {
    /// Summarize one duration value per execution
    pub fn from_durations(durations: &[f64]) -> Result<Self, String> {
        if durations.is_empty() {
            return Err("Cannot summarize an empty list of durations".to_string());
        }
        Ok(Self {
            mean: mean(durations),
            std: population_std(durations),
        })
    }

    /// Write the summary as a JSON file
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Cross-execution mean±std grid formatted for reporting.
/// Present cells read `mean+-std` with two decimals; missing cells read `-`
/// in the table and stay empty in the CSV.
#[derive(Debug, Clone)]
pub struct MeanStdTable {
    axes: GridAxes,
    cells: Vec<String>,
}

impl MeanStdTable {
    /// Merge the aggregated mean and std grids
    pub fn from_grids(
        mean_grid: &BucketGrid,
        std_grid: &BucketGrid,
        axes: &GridAxes,
    ) -> Result<Self, String> {
        if mean_grid.rows() != axes.rows()
            || mean_grid.cols() != axes.cols()
            || std_grid.rows() != axes.rows()
            || std_grid.cols() != axes.cols()
        {
            return Err(format!(
                "Grid shape does not match the {}x{} axes",
                axes.rows(),
                axes.cols()
            ));
        }

        let mut cells = Vec::with_capacity(axes.rows() * axes.cols());
        for row in 0..axes.rows() {
            for col in 0..axes.cols() {
                let cell = match (mean_grid.get(row, col), std_grid.get(row, col)) {
                    (Some(m), Some(s)) => format!("{:.2}+-{:.2}", m, s),
                    (None, None) => String::new(),
                    _ => {
                        return Err(format!(
                            "Mean and std grids disagree on cell ({}, {})",
                            row, col
                        ));
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            axes: axes.clone(),
            cells,
        })
    }

    /// Cell text, empty when missing
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.cells[row * self.axes.cols() + col]
    }

    /// Aligned console table. Rows print highest leniency first so the
    /// orientation matches the heatmaps (lowest bucket at the bottom).
    pub fn format_table(&self) -> String {
        let label_width = self
            .axes
            .leniency
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .unwrap_or(0);
        let cell_width = self
            .cells
            .iter()
            .map(|c| c.len().max(1))
            .chain(self.axes.exploration.labels.iter().map(|l| l.len()))
            .max()
            .unwrap_or(1);

        let mut output = String::new();
        output.push_str(&format!("  {:>label_width$}", ""));
        for col in 0..self.axes.cols() {
            output.push_str(&format!(
                "  {:>cell_width$}",
                self.axes.exploration.label(col)
            ));
        }
        output.push('\n');

        for row in (0..self.axes.rows()).rev() {
            output.push_str(&format!("  {:>label_width$}", self.axes.leniency.label(row)));
            for col in 0..self.axes.cols() {
                let cell = self.cell(row, col);
                let cell = if cell.is_empty() { "-" } else { cell };
                output.push_str(&format!("  {:>cell_width$}", cell));
            }
            output.push('\n');
        }

        output
    }

    /// CSV dump: exploration labels as the header, one line per leniency
    /// row (highest first), missing cells as empty fields
    pub fn format_csv(&self) -> String {
        let mut output = String::from("leniency");
        for col in 0..self.axes.cols() {
            output.push(',');
            output.push_str(self.axes.exploration.label(col));
        }
        output.push('\n');

        for row in (0..self.axes.rows()).rev() {
            output.push_str(self.axes.leniency.label(row));
            for col in 0..self.axes.cols() {
                output.push(',');
                output.push_str(self.cell(row, col));
            }
            output.push('\n');
        }

        output
    }

    /// Write the CSV dump to a file
    pub fn write_csv(&self, path: &Path) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.format_csv().as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::BucketAxis;

    fn two_by_two_axes() -> GridAxes {
        GridAxes {
            exploration: BucketAxis::new(&["0.0-0.5", "0.5-1.0"]),
            leniency: BucketAxis::new(&["0.0-0.5", "0.5-1.0"]),
        }
    }

    #[test]
    fn test_duration_summary_scenario() {
        let summary = DurationSummary::from_durations(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(summary.mean, 20.0);
        assert!((summary.std - 8.16496580927726).abs() < 1e-9);
    }

    #[test]
    fn test_duration_summary_rejects_empty_input() {
        assert!(DurationSummary::from_durations(&[]).is_err());
    }

    #[test]
    fn test_duration_summary_round_trips_as_json() {
        let summary = DurationSummary::from_durations(&[10.0, 20.0, 30.0]).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let back: DurationSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(back.mean, summary.mean);
        assert_eq!(back.std, summary.std);
        assert!(json.contains("\"mean\""));
        assert!(json.contains("\"std\""));
    }

    #[test]
    fn test_merged_cells_format() {
        let axes = two_by_two_axes();
        let mut mean_grid = BucketGrid::new(2, 2);
        let mut std_grid = BucketGrid::new(2, 2);
        mean_grid.set(0, 0, 3.0);
        std_grid.set(0, 0, 2.0);
        mean_grid.set(1, 1, 6.128);
        std_grid.set(1, 1, 0.5);

        let table = MeanStdTable::from_grids(&mean_grid, &std_grid, &axes).unwrap();
        assert_eq!(table.cell(0, 0), "3.00+-2.00");
        assert_eq!(table.cell(1, 1), "6.13+-0.50");
        assert_eq!(table.cell(0, 1), "");
    }

    #[test]
    fn test_table_prints_missing_as_dash_and_highest_row_first() {
        let axes = two_by_two_axes();
        let mut mean_grid = BucketGrid::new(2, 2);
        let mut std_grid = BucketGrid::new(2, 2);
        mean_grid.set(0, 0, 1.0);
        std_grid.set(0, 0, 0.0);

        let table = MeanStdTable::from_grids(&mean_grid, &std_grid, &axes).unwrap();
        let text = table.format_table();
        let lines: Vec<&str> = text.lines().collect();

        // Header, then row 1 (top), then row 0 (bottom)
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("0.5-1.0"));
        assert!(lines[2].trim_start().starts_with("0.0-0.5"));
        // Row 1 is all missing, rendered as dashes
        assert!(lines[1].trim_end().ends_with('-'));
        assert!(lines[2].contains("1.00+-0.00"));
    }

    #[test]
    fn test_csv_keeps_missing_cells_empty() {
        let axes = two_by_two_axes();
        let mut mean_grid = BucketGrid::new(2, 2);
        let mut std_grid = BucketGrid::new(2, 2);
        mean_grid.set(0, 1, 2.0);
        std_grid.set(0, 1, 1.0);

        let table = MeanStdTable::from_grids(&mean_grid, &std_grid, &axes).unwrap();
        let csv = table.format_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "leniency,0.0-0.5,0.5-1.0");
        assert_eq!(lines[1], "0.5-1.0,,");
        assert_eq!(lines[2], "0.0-0.5,,2.00+-1.00");
    }

    #[test]
    fn test_from_grids_rejects_shape_mismatch() {
        let axes = two_by_two_axes();
        let small = BucketGrid::new(1, 1);
        let right = BucketGrid::new(2, 2);
        assert!(MeanStdTable::from_grids(&small, &right, &axes).is_err());
    }
}

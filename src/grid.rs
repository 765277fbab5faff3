//! Bucket-map aggregation
//!
//! The dense archive grid: leniency buckets as rows, exploration buckets as
//! columns. A cell with no record is explicitly missing rather than zero or
//! NaN, and cross-execution aggregation skips missing cells per cell.

use crate::axes::GridAxes;
use crate::results::LevelRecord;
use crate::{mean, population_std};

/// Dense row-major grid over the archive axes with explicit missing cells
#[derive(Debug, Clone, PartialEq)]
pub struct BucketGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl BucketGrid {
    /// Allocate an all-missing grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value, None when missing
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.cells[idx] = Some(value);
    }

    /// Upper bound for the color scale: the largest non-missing value,
    /// clamped up to the fixed scale floor of 0. Missing cells never feed
    /// the maximum.
    pub fn max_value(&self) -> f64 {
        self.cells.iter().flatten().fold(0.0_f64, |acc, v| acc.max(*v))
    }
}

/// Build the grid of one named attribute from an execution's records.
///
/// Every record must carry the attribute. A duplicate address keeps the
/// later record and prints a warning.
pub fn build_grid(
    records: &[LevelRecord],
    attribute: &str,
    axes: &GridAxes,
) -> Result<BucketGrid, String> {
    let mut grid = BucketGrid::new(axes.rows(), axes.cols());

    for record in records {
        if record.exploration >= grid.cols() || record.leniency >= grid.rows() {
            return Err(format!(
                "Record address (exploration {}, leniency {}) is outside the {}x{} grid",
                record.exploration,
                record.leniency,
                grid.rows(),
                grid.cols()
            ));
        }
        let value = record.value(attribute).ok_or_else(|| {
            format!(
                "Record at exploration {} leniency {} has no attribute '{}'",
                record.exploration, record.leniency, attribute
            )
        })?;
        if grid.get(record.leniency, record.exploration).is_some() {
            eprintln!(
                "Warning: cell (leniency {}, exploration {}) filled more than once for '{}'; keeping the later record",
                record.leniency, record.exploration, attribute
            );
        }
        grid.set(record.leniency, record.exploration, value);
    }

    Ok(grid)
}

/// Cell-wise mean and population standard deviation across executions.
///
/// Each cell aggregates over the executions where it is present; divisors
/// are the contributing count, not the execution count. A cell missing in
/// every execution stays missing in both outputs.
pub fn aggregate(grids: &[BucketGrid]) -> Result<(BucketGrid, BucketGrid), String> {
    let first = grids
        .first()
        .ok_or_else(|| "Cannot aggregate an empty set of grids".to_string())?;
    for grid in grids {
        if grid.rows() != first.rows() || grid.cols() != first.cols() {
            return Err(format!(
                "Grid shape mismatch: expected {}x{}, found {}x{}",
                first.rows(),
                first.cols(),
                grid.rows(),
                grid.cols()
            ));
        }
    }

    let mut mean_grid = BucketGrid::new(first.rows(), first.cols());
    let mut std_grid = BucketGrid::new(first.rows(), first.cols());

    for row in 0..first.rows() {
        for col in 0..first.cols() {
            let samples: Vec<f64> = grids.iter().filter_map(|g| g.get(row, col)).collect();
            if !samples.is_empty() {
                mean_grid.set(row, col, mean(&samples));
                std_grid.set(row, col, population_std(&samples));
            }
        }
    }

    Ok((mean_grid, std_grid))
}

//! Bucket axes for the archive grid
//!
//! The external generator places each level into a 2-D archive addressed by
//! two discretized behavioral characteristics: exploration (columns) and
//! leniency (rows). Each axis is an ordered list of range labels like
//! `"0.5-0.6"`, lowest bucket first. The label lists double as the grid
//! dimensions, the heatmap tick labels, and the cross-validation ranges.

use serde::Deserialize;
use std::fs;

/// Axis definition file (optional, falls back to built-in defaults)
pub const AXES_FILE: &str = "config/axes.toml";

/// One discretized axis: ordered bucket labels, lowest range first
#[derive(Debug, Clone, Deserialize)]
pub struct BucketAxis {
    pub labels: Vec<String>,
}

impl BucketAxis {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Parse the bucket's label into numeric bounds.
    /// Labels that are not of the `lo-hi` form yield None.
    pub fn range(&self, index: usize) -> Option<(f64, f64)> {
        let label = self.labels.get(index)?;
        let (lo, hi) = label.split_once('-')?;
        let lo: f64 = lo.trim().parse().ok()?;
        let hi: f64 = hi.trim().parse().ok()?;
        Some((lo, hi))
    }

    /// Whether `value` falls inside bucket `index`.
    ///
    /// Buckets are half-open `[lo, hi)`, except the last bucket, which
    /// closes its upper bound so a sample at the axis maximum still lands
    /// in-grid. Returns None when the label has no parseable range.
    pub fn contains(&self, index: usize, value: f64) -> Option<bool> {
        let (lo, hi) = self.range(index)?;
        let inside = if index + 1 == self.len() {
            value >= lo && value <= hi
        } else {
            value >= lo && value < hi
        };
        Some(inside)
    }
}

/// The two archive axes. Row index 0 is the lowest leniency bucket and
/// column index 0 the lowest exploration bucket; the renderer puts row 0 at
/// the bottom of the image.
#[derive(Debug, Clone, Deserialize)]
pub struct GridAxes {
    pub exploration: BucketAxis,
    pub leniency: BucketAxis,
}

impl Default for GridAxes {
    fn default() -> Self {
        Self {
            exploration: BucketAxis::new(&[
                "0.5-0.6", "0.6-0.7", "0.7-0.8", "0.8-0.9", "0.9-1.0",
            ]),
            leniency: BucketAxis::new(&[
                "0.0-0.1", "0.1-0.2", "0.2-0.3", "0.3-0.4", "0.4-0.5",
            ]),
        }
    }
}

impl GridAxes {
    /// Grid row count (leniency buckets)
    pub fn rows(&self) -> usize {
        self.leniency.len()
    }

    /// Grid column count (exploration buckets)
    pub fn cols(&self) -> usize {
        self.exploration.len()
    }

    /// Load axis definitions from a TOML file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        let axes: GridAxes =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))?;
        axes.validate()?;
        Ok(axes)
    }

    /// Load axes from the default config file, falling back to the built-in
    /// five-bucket axes when the file is absent or unreadable
    pub fn from_config_files() -> Self {
        if let Ok(axes) = Self::from_file(AXES_FILE) {
            return axes;
        }
        Self::default()
    }

    /// An axis with no buckets makes every grid operation meaningless
    pub fn validate(&self) -> Result<(), String> {
        if self.exploration.is_empty() {
            return Err("Axis config error: exploration has no buckets".to_string());
        }
        if self.leniency.is_empty() {
            return Err("Axis config error: leniency has no buckets".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_AXES: &str = r#"
[exploration]
labels = ["0.0-0.5", "0.5-1.0"]

[leniency]
labels = ["0.0-0.2", "0.2-0.4", "0.4-0.6"]
"#;

    #[test]
    fn test_default_axes_shape() {
        let axes = GridAxes::default();
        assert_eq!(axes.rows(), 5);
        assert_eq!(axes.cols(), 5);
        assert_eq!(axes.exploration.label(0), "0.5-0.6");
        assert_eq!(axes.leniency.label(4), "0.4-0.5");
    }

    #[test]
    fn test_parse_toml_axes() {
        let axes: GridAxes = toml::from_str(SAMPLE_AXES).unwrap();
        assert_eq!(axes.cols(), 2);
        assert_eq!(axes.rows(), 3);
        assert_eq!(axes.leniency.label(2), "0.4-0.6");
        assert!(axes.validate().is_ok());
    }

    #[test]
    fn test_range_parsing() {
        let axes = GridAxes::default();
        assert_eq!(axes.exploration.range(0), Some((0.5, 0.6)));
        assert_eq!(axes.leniency.range(4), Some((0.4, 0.5)));

        let named = BucketAxis::new(&["low", "high"]);
        assert_eq!(named.range(0), None);
        assert_eq!(named.contains(0, 0.3), None);
    }

    #[test]
    fn test_half_open_containment() {
        let axes = GridAxes::default();
        assert_eq!(axes.exploration.contains(0, 0.5), Some(true));
        assert_eq!(axes.exploration.contains(0, 0.55), Some(true));
        // Upper bound belongs to the next bucket
        assert_eq!(axes.exploration.contains(0, 0.6), Some(false));
        assert_eq!(axes.exploration.contains(1, 0.6), Some(true));
    }

    #[test]
    fn test_last_bucket_closes_upper_bound() {
        let axes = GridAxes::default();
        assert_eq!(axes.exploration.contains(4, 1.0), Some(true));
        assert_eq!(axes.leniency.contains(4, 0.5), Some(true));
        assert_eq!(axes.exploration.contains(4, 1.01), Some(false));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let axes = GridAxes {
            exploration: BucketAxis::new(&[]),
            leniency: BucketAxis::new(&["0.0-0.1"]),
        };
        assert!(axes.validate().is_err());
    }
}

//! Generator result-file parsing
//!
//! One execution directory holds `data.json` (run metadata, including the
//! wall-clock duration) plus one `level-<exploration>-<leniency>.json` file
//! per filled archive cell. The bucket address lives in the filename by
//! convention; the JSON body carries the numeric attributes to aggregate.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::axes::GridAxes;
use crate::constants::{DATA_FILENAME, FILENAME_SEPARATOR, JSON_EXTENSION, LEVEL_FILE_PREFIX};

/// One parsed level file: the filename-derived bucket address plus every
/// top-level numeric attribute from the JSON body
#[derive(Debug, Clone)]
pub struct LevelRecord {
    /// Exploration bucket index (grid column)
    pub exploration: usize,
    /// Leniency bucket index (grid row)
    pub leniency: usize,
    /// Numeric attributes: fitness, generation, fitness sub-components, and
    /// whatever else the generator variant writes
    pub values: HashMap<String, f64>,
}

impl LevelRecord {
    /// Look up a named attribute
    pub fn value(&self, attribute: &str) -> Option<f64> {
        self.values.get(attribute).copied()
    }
}

/// Per-execution metadata from `data.json` (extra fields ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    /// Wall-clock duration of the generator run
    pub duration: f64,
}

/// Everything one execution directory produced
#[derive(Debug, Clone)]
pub struct ExecutionResults {
    pub run: RunData,
    pub records: Vec<LevelRecord>,
}

/// Parse a level filename into its (exploration, leniency) bucket address.
///
/// The convention is `level-<exploration>-<leniency>.json`: the first token
/// is the exploration index (column), the second the leniency index (row).
pub fn parse_level_filename(name: &str) -> Result<(usize, usize), String> {
    let malformed = || format!("Malformed level filename: {}", name);

    let stem = name
        .strip_prefix(LEVEL_FILE_PREFIX)
        .and_then(|s| s.strip_prefix(FILENAME_SEPARATOR))
        .and_then(|s| s.strip_suffix(JSON_EXTENSION))
        .ok_or_else(malformed)?;

    let (exploration, leniency) = stem.split_once(FILENAME_SEPARATOR).ok_or_else(malformed)?;
    if leniency.contains(FILENAME_SEPARATOR) {
        return Err(malformed());
    }

    let exploration: usize = exploration.parse().map_err(|_| malformed())?;
    let leniency: usize = leniency.parse().map_err(|_| malformed())?;
    Ok((exploration, leniency))
}

/// Parse one level file's name and body into a record
pub fn parse_level_record(
    name: &str,
    content: &str,
    axes: &GridAxes,
) -> Result<LevelRecord, String> {
    let (exploration, leniency) = parse_level_filename(name)?;

    if exploration >= axes.cols() {
        return Err(format!(
            "Exploration index {} in {} is out of range (axis has {} buckets)",
            exploration,
            name,
            axes.cols()
        ));
    }
    if leniency >= axes.rows() {
        return Err(format!(
            "Leniency index {} in {} is out of range (axis has {} buckets)",
            leniency,
            name,
            axes.rows()
        ));
    }

    let body: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("Failed to parse {}: {}", name, e))?;
    let fields = body
        .as_object()
        .ok_or_else(|| format!("Malformed record {}: expected a JSON object", name))?;

    let mut values = HashMap::new();
    for (key, field) in fields {
        if let Some(number) = field.as_f64() {
            values.insert(key.clone(), number);
        }
    }

    let record = LevelRecord {
        exploration,
        leniency,
        values,
    };
    cross_validate(&record, name, axes)?;
    Ok(record)
}

/// The filename address is canonical, but some generator variants also write
/// the raw exploration/leniency samples into the body. When a sample is
/// present and the addressed bucket's label parses as a range, the sample
/// must fall inside that bucket.
fn cross_validate(record: &LevelRecord, name: &str, axes: &GridAxes) -> Result<(), String> {
    if let Some(sample) = record.value("exploration") {
        if axes.exploration.contains(record.exploration, sample) == Some(false) {
            return Err(format!(
                "Consistency check failed for {}: exploration {} is outside bucket {} ({})",
                name,
                sample,
                record.exploration,
                axes.exploration.label(record.exploration)
            ));
        }
    }
    if let Some(sample) = record.value("leniency") {
        if axes.leniency.contains(record.leniency, sample) == Some(false) {
            return Err(format!(
                "Consistency check failed for {}: leniency {} is outside bucket {} ({})",
                name,
                sample,
                record.leniency,
                axes.leniency.label(record.leniency)
            ));
        }
    }
    Ok(())
}

/// Parse an execution's worth of (filename, content) pairs.
///
/// `data.json` is identified by name, never by read order. Every other file
/// must be a well-formed level file; anything else in the directory is a
/// fatal input-format error. Files are processed in filename order so
/// duplicate-cell resolution does not depend on directory iteration order.
pub fn parse_execution_files(
    files: &[(String, String)],
    axes: &GridAxes,
) -> Result<ExecutionResults, String> {
    let mut sorted: Vec<&(String, String)> = files.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut run: Option<RunData> = None;
    let mut records = Vec::new();

    for (name, content) in sorted {
        if name == DATA_FILENAME {
            let data: RunData = serde_json::from_str(content)
                .map_err(|e| format!("Failed to parse {}: {}", name, e))?;
            run = Some(data);
        } else {
            records.push(parse_level_record(name, content, axes)?);
        }
    }

    let run = run.ok_or_else(|| format!("No {} found among the result files", DATA_FILENAME))?;
    Ok(ExecutionResults { run, records })
}

/// Load one execution directory (`results/<configuration>/<execution>/`)
pub fn load_execution_dir(dir: &Path, axes: &GridAxes) -> Result<ExecutionResults, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read results directory {}: {}", dir.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| format!("Failed to read entry in {}: {}", dir.display(), e))?;
        let path = entry.path();
        if !path.extension().is_some_and(|e| e == "json") {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        files.push((name, content));
    }

    parse_execution_files(&files, axes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LEVEL: &str = r#"{
        "dimensions": { "width": 10, "height": 8 },
        "generation": 42,
        "fitness": 3.25,
        "fGoal": 2.5,
        "fEnemySparsity": -0.75
    }"#;

    fn sample_files() -> Vec<(String, String)> {
        vec![
            (
                "data.json".to_string(),
                r#"{ "parameters": { "seed": 7 }, "duration": 12.5 }"#.to_string(),
            ),
            (
                "level-0-0.json".to_string(),
                r#"{ "fitness": 1.0, "generation": 3 }"#.to_string(),
            ),
            (
                "level-1-0.json".to_string(),
                r#"{ "fitness": 2.0, "generation": 5 }"#.to_string(),
            ),
            (
                "level-0-1.json".to_string(),
                r#"{ "fitness": 3.0, "generation": 9 }"#.to_string(),
            ),
        ]
    }

    #[test]
    fn test_parse_level_filename() {
        assert_eq!(parse_level_filename("level-2-3.json").unwrap(), (2, 3));
        assert_eq!(parse_level_filename("level-0-0.json").unwrap(), (0, 0));
    }

    #[test]
    fn test_malformed_filenames_rejected() {
        assert!(parse_level_filename("level-2.json").is_err());
        assert!(parse_level_filename("level-1-2-3.json").is_err());
        assert!(parse_level_filename("level-a-b.json").is_err());
        assert!(parse_level_filename("elite-1-2.json").is_err());
        assert!(parse_level_filename("level-1-2.txt").is_err());
    }

    #[test]
    fn test_parse_level_record_collects_numeric_fields() {
        let axes = GridAxes::default();
        let record = parse_level_record("level-3-1.json", SAMPLE_LEVEL, &axes).unwrap();

        assert_eq!(record.exploration, 3);
        assert_eq!(record.leniency, 1);
        assert_eq!(record.value("fitness"), Some(3.25));
        assert_eq!(record.value("generation"), Some(42.0));
        assert_eq!(record.value("fGoal"), Some(2.5));
        assert_eq!(record.value("fEnemySparsity"), Some(-0.75));
        // Nested objects are not attributes
        assert_eq!(record.value("dimensions"), None);
    }

    #[test]
    fn test_missing_attribute_is_absent_not_zero() {
        let axes = GridAxes::default();
        let record = parse_level_record("level-0-0.json", r#"{ "fitness": 1.0 }"#, &axes).unwrap();
        assert_eq!(record.value("generation"), None);
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let axes = GridAxes::default();
        assert!(parse_level_record("level-5-0.json", "{}", &axes).is_err());
        assert!(parse_level_record("level-0-5.json", "{}", &axes).is_err());
    }

    #[test]
    fn test_cross_validation_accepts_in_bucket_sample() {
        let axes = GridAxes::default();
        // Column 2 is 0.7-0.8, row 1 is 0.1-0.2
        let body = r#"{ "fitness": 1.0, "exploration": 0.75, "leniency": 0.15 }"#;
        assert!(parse_level_record("level-2-1.json", body, &axes).is_ok());
    }

    #[test]
    fn test_cross_validation_rejects_out_of_bucket_sample() {
        let axes = GridAxes::default();
        let body = r#"{ "fitness": 1.0, "exploration": 0.95 }"#;
        let err = parse_level_record("level-2-1.json", body, &axes).unwrap_err();
        assert!(err.contains("Consistency check failed"));

        let body = r#"{ "fitness": 1.0, "leniency": 0.45 }"#;
        assert!(parse_level_record("level-2-1.json", body, &axes).is_err());
    }

    #[test]
    fn test_parse_execution_files() {
        let axes = GridAxes::default();
        let results = parse_execution_files(&sample_files(), &axes).unwrap();

        assert_eq!(results.run.duration, 12.5);
        assert_eq!(results.records.len(), 3);
    }

    #[test]
    fn test_data_json_matched_by_name_not_order() {
        let axes = GridAxes::default();
        let mut files = sample_files();
        // data.json listed last must still be recognized
        files.rotate_left(1);
        let results = parse_execution_files(&files, &axes).unwrap();
        assert_eq!(results.run.duration, 12.5);
    }

    #[test]
    fn test_missing_data_json_is_fatal() {
        let axes = GridAxes::default();
        let files = vec![(
            "level-0-0.json".to_string(),
            r#"{ "fitness": 1.0 }"#.to_string(),
        )];
        let err = parse_execution_files(&files, &axes).unwrap_err();
        assert!(err.contains("data.json"));
    }

    #[test]
    fn test_stray_json_file_is_fatal() {
        let axes = GridAxes::default();
        let mut files = sample_files();
        files.push(("notes.json".to_string(), "{}".to_string()));
        assert!(parse_execution_files(&files, &axes).is_err());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let axes = GridAxes::default();
        let dir = std::env::temp_dir().join("mapsweep_missing_results_dir");
        let err = load_execution_dir(&dir, &axes).unwrap_err();
        assert!(err.contains("Failed to read results directory"));
    }
}

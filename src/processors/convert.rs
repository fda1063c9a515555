//! End-to-end CSV to dashboard JSON conversion.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PipelineConfig;
use crate::core::loaders::{load_raw_csv, LoaderError};
use crate::core::writers::{write_json, WriteError};

use super::transformer::{TransformOutput, TransformStats, Transformer};

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to load source: {0}")]
    Load(#[from] LoaderError),

    #[error("failed to write output: {0}")]
    Write(#[from] WriteError),
}

/// Result of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub input: PathBuf,
    /// `None` when the run did not write anything (dry run).
    pub output: Option<PathBuf>,
    pub stats: TransformStats,
}

/// Load a climate CSV and normalize its rows without writing anything.
pub fn transform_csv(input: &Path, config: &PipelineConfig) -> Result<TransformOutput, ConvertError> {
    let rows = load_raw_csv(input)?;
    Ok(Transformer::new(config.processing.clone()).run(&rows))
}

/// Convert a climate CSV into the dashboard JSON document.
///
/// The whole input is transformed before anything is written; the output is
/// produced in one atomic write.
///
/// # Arguments
///
/// * `input` - Source CSV file
/// * `output` - Destination JSON file
/// * `config` - Indentation and row processing settings
///
/// # Returns
///
/// A summary carrying the number of records written and the drop counters.
pub fn convert_csv_to_json(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<ConvertSummary, ConvertError> {
    let TransformOutput { records, stats } = transform_csv(input, config)?;
    write_json(output, &records, config.output.indent)?;

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output: Some(output.to_path_buf()),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    const EXAMPLE_CSV: &str = "\
Date,Country,Continent,Temperature,CO2 Emissions,Sea Level Rise,Precipitation,Humidity,Wind Speed,Year,Month
2020-01-15,Brazil,South America,27.456789,410.2,3.1,120.0,80,12.3,2020,1
bad-date,,Asia,,300,1.0,,,,2019,5
2021-06-01,India,Asia,31.1,,,,,,,2021,6
";

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("climate.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_convert_example_dataset() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, EXAMPLE_CSV);
        let output = dir.path().join("data").join("climate_data.json");

        let summary = convert_csv_to_json(&input, &output, &PipelineConfig::default()).unwrap();
        assert_eq!(summary.stats.rows_read, 3);
        assert_eq!(summary.stats.rows_emitted, 2);
        assert_eq!(summary.stats.dropped_missing_country, 1);
        assert_eq!(summary.stats.invalid_dates, 1);

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let expected = json!([
            {"date":"2020-01-15","country":"Brazil","continent":"South America","year":2020,"month":1,"temperature":27.457,"co2":410.2,"sea_level":3.1,"precipitation":120.0,"humidity":80.0,"wind_speed":12.3},
            {"date":"2021-06-01","country":"India","continent":"Asia","year":2021,"month":6,"temperature":31.1,"co2":null,"sea_level":null,"precipitation":null,"humidity":null,"wind_speed":null}
        ]);
        assert_eq!(written, expected);
    }

    #[test]
    fn test_convert_output_layout() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, EXAMPLE_CSV);
        let output = dir.path().join("out.json");

        convert_csv_to_json(&input, &output, &PipelineConfig::default()).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("[\n  {\n    \"date\": \"2020-01-15\",\n    \"country\": \"Brazil\","));
        assert!(content.ends_with("]\n"));
    }

    #[test]
    fn test_convert_header_only_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let header = EXAMPLE_CSV.lines().next().unwrap();
        let input = write_input(&dir, &format!("{header}\n"));
        let output = dir.path().join("out.json");

        let summary = convert_csv_to_json(&input, &output, &PipelineConfig::default()).unwrap();

        assert_eq!(summary.stats.rows_emitted, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "[]\n");
    }

    #[test]
    fn test_convert_missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.json");

        let result = convert_csv_to_json(
            &dir.path().join("missing.csv"),
            &output,
            &PipelineConfig::default(),
        );

        assert!(matches!(result, Err(ConvertError::Load(LoaderError::Io { .. }))));
        assert!(!output.exists());
    }

    #[test]
    fn test_convert_empty_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "");
        let output = dir.path().join("out.json");

        let result = convert_csv_to_json(&input, &output, &PipelineConfig::default());

        assert!(matches!(result, Err(ConvertError::Load(LoaderError::EmptyFile(_)))));
        assert!(!output.exists());
    }

    #[test]
    fn test_transform_csv_parallel_config() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, EXAMPLE_CSV);

        let mut config = PipelineConfig::default();
        config.processing.parallel = true;
        config.processing.min_parallel_rows = 1;

        let output = transform_csv(&input, &config).unwrap();
        let countries: Vec<&str> = output.records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Brazil", "India"]);
    }
}

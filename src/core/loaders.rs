//! Data loader for climate CSV files.
//!
//! The reader is deliberately lenient about row shape: rows may be shorter or
//! longer than the header, and cell contents are never interpreted here.
//! Only structural failures (missing file, no header, broken CSV framing)
//! are errors.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use thiserror::Error;

use super::records::{source_columns, RawRecord};

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("input has no header row")]
    MissingHeader,
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Read raw records from any CSV byte source.
///
/// The first row is the header. Header names are trimmed; cell values are
/// kept verbatim. Cells beyond the header width are ignored, and columns a
/// short row does not reach are absent from its [`RawRecord`].
///
/// # Errors
///
/// Returns [`LoaderError::MissingHeader`] if the input is empty and
/// [`LoaderError::Csv`] on malformed CSV (e.g. invalid UTF-8).
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoaderError::MissingHeader);
    }

    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<&str> = source_columns().filter(|c| !present.contains(c)).collect();
    if !missing.is_empty() {
        warn!("Source is missing expected columns: {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RawRecord::with_capacity(headers.len());
        for (column, value) in headers.iter().zip(record.iter()) {
            row.insert(column, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Load raw records from a CSV file.
///
/// # Arguments
///
/// * `path` - Path to the climate CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be opened, has no header row, or is
/// not valid CSV. A header-only file is not an error and yields no rows.
pub fn load_raw_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rows = match read_raw_records(BufReader::new(file)) {
        Ok(rows) => rows,
        Err(LoaderError::MissingHeader) => return Err(LoaderError::EmptyFile(path.to_path_buf())),
        Err(e) => return Err(e),
    };

    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

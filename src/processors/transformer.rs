//! Raw row to dashboard record transformation.
//!
//! Each row goes through the same fixed sequence, independently of every
//! other row:
//!
//! 1. field mapping and projection onto the output schema ([`MappedRow`])
//! 2. date normalization
//! 3. numeric coercion and rounding
//! 4. validation of the required fields
//!
//! Surviving rows are emitted in input order. Rows can be mapped on the rayon
//! pool; indexed `collect` keeps the order identical to the sequential path.

use std::fmt;

use chrono::Datelike;
use log::{debug, info};
use rayon::prelude::*;

use crate::config::ProcessingConfig;
use crate::core::records::{columns, NormalizedRecord, RawRecord};
use crate::core::transforms::{
    parse_date, parse_measurement, parse_month, parse_text, parse_year,
};

/// Raw cells of one row renamed to output fields. Source columns outside the
/// mapping are not reachable from here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappedRow<'a> {
    pub date: Option<&'a str>,
    pub country: Option<&'a str>,
    pub continent: Option<&'a str>,
    pub year: Option<&'a str>,
    pub month: Option<&'a str>,
    pub temperature: Option<&'a str>,
    pub co2: Option<&'a str>,
    pub sea_level: Option<&'a str>,
    pub precipitation: Option<&'a str>,
    pub humidity: Option<&'a str>,
    pub wind_speed: Option<&'a str>,
}

impl<'a> MappedRow<'a> {
    /// Apply the fixed column mapping to a raw row.
    pub fn from_raw(raw: &'a RawRecord) -> Self {
        Self {
            date: raw.get(columns::DATE),
            country: raw.get(columns::COUNTRY),
            continent: raw.get(columns::CONTINENT),
            year: raw.get(columns::YEAR),
            month: raw.get(columns::MONTH),
            temperature: raw.get(columns::TEMPERATURE),
            co2: raw.get(columns::CO2),
            sea_level: raw.get(columns::SEA_LEVEL),
            precipitation: raw.get(columns::PRECIPITATION),
            humidity: raw.get(columns::HUMIDITY),
            wind_speed: raw.get(columns::WIND_SPEED),
        }
    }
}

/// Why a row was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingCountry,
    MissingYear,
    MissingTemperature,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::MissingCountry => "missing country",
            DropReason::MissingYear => "missing year",
            DropReason::MissingTemperature => "missing temperature",
        };
        f.write_str(text)
    }
}

/// Outcome of normalizing one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub result: Result<NormalizedRecord, DropReason>,
    /// The `Date` cell had content that did not parse.
    pub invalid_date: bool,
}

/// Normalize a single raw row.
///
/// Malformed cells become `None`. When the `Year` cell is unusable the year
/// is taken from the parsed date; a missing or out-of-range `Month` falls back
/// the same way. The row is rejected if country, year or temperature is still
/// missing after coercion, checked in that order.
pub fn normalize_row(raw: &RawRecord) -> RowOutcome {
    let mapped = MappedRow::from_raw(raw);

    let date = parse_date(mapped.date);
    let invalid_date = date.is_none() && mapped.date.is_some_and(|s| !s.trim().is_empty());

    let country = parse_text(mapped.country);
    let continent = parse_text(mapped.continent);
    let year = parse_year(mapped.year).or_else(|| date.map(|d| d.year()));
    let month = parse_month(mapped.month).or_else(|| date.map(|d| d.month()));
    let temperature = parse_measurement(mapped.temperature);

    let result = match (country, year, temperature) {
        (None, _, _) => Err(DropReason::MissingCountry),
        (_, None, _) => Err(DropReason::MissingYear),
        (_, _, None) => Err(DropReason::MissingTemperature),
        (Some(country), Some(year), Some(temperature)) => Ok(NormalizedRecord {
            date,
            country,
            continent,
            year,
            month,
            temperature,
            co2: parse_measurement(mapped.co2),
            sea_level: parse_measurement(mapped.sea_level),
            precipitation: parse_measurement(mapped.precipitation),
            humidity: parse_measurement(mapped.humidity),
            wind_speed: parse_measurement(mapped.wind_speed),
        }),
    };

    RowOutcome {
        result,
        invalid_date,
    }
}

/// Counters collected over one transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub rows_read: usize,
    pub rows_emitted: usize,
    pub dropped_missing_country: usize,
    pub dropped_missing_year: usize,
    pub dropped_missing_temperature: usize,
    /// Rows (kept or dropped) whose non-empty `Date` cell did not parse.
    pub invalid_dates: usize,
}

impl TransformStats {
    /// Total rows left out of the output.
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_country + self.dropped_missing_year + self.dropped_missing_temperature
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingCountry => self.dropped_missing_country += 1,
            DropReason::MissingYear => self.dropped_missing_year += 1,
            DropReason::MissingTemperature => self.dropped_missing_temperature += 1,
        }
    }
}

/// Records produced by a transformation plus its counters.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub records: Vec<NormalizedRecord>,
    pub stats: TransformStats,
}

/// Maps raw rows to normalized records.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: ProcessingConfig,
}

impl Transformer {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    fn use_parallel(&self, rows: usize) -> bool {
        self.config.parallel && rows >= self.config.min_parallel_rows
    }

    /// Transform all rows, returning the surviving records in input order
    /// together with drop counters.
    pub fn run(&self, rows: &[RawRecord]) -> TransformOutput {
        let outcomes: Vec<RowOutcome> = if self.use_parallel(rows.len()) {
            debug!("Normalizing {} rows on the rayon pool", rows.len());
            rows.par_iter().map(normalize_row).collect()
        } else {
            rows.iter().map(normalize_row).collect()
        };

        let mut stats = TransformStats {
            rows_read: rows.len(),
            ..TransformStats::default()
        };
        let mut records = Vec::with_capacity(outcomes.len());

        for (index, outcome) in outcomes.into_iter().enumerate() {
            if outcome.invalid_date {
                stats.invalid_dates += 1;
            }
            match outcome.result {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!("Dropping row {}: {}", index + 1, reason);
                    stats.record_drop(reason);
                }
            }
        }
        stats.rows_emitted = records.len();

        info!(
            "Transformed {} rows: {} emitted, {} dropped, {} unparseable dates",
            stats.rows_read,
            stats.rows_emitted,
            stats.rows_dropped(),
            stats.invalid_dates
        );

        TransformOutput { records, stats }
    }

    /// Transform all rows and return only the surviving records.
    pub fn transform(&self, rows: &[RawRecord]) -> Vec<NormalizedRecord> {
        self.run(rows).records
    }
}

/// Transform rows sequentially with the default settings.
pub fn transform(rows: &[RawRecord]) -> Vec<NormalizedRecord> {
    Transformer::default().transform(rows)
}

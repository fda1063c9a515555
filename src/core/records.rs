//! Record types shared by the loader, transformer and writer.
//!
//! A [`RawRecord`] is one source row keyed by the CSV header names. A
//! [`NormalizedRecord`] is the fixed-schema unit written to the dashboard JSON.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Source column names as they appear in the CSV header.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const COUNTRY: &str = "Country";
    pub const CONTINENT: &str = "Continent";
    pub const TEMPERATURE: &str = "Temperature";
    pub const CO2: &str = "CO2 Emissions";
    pub const SEA_LEVEL: &str = "Sea Level Rise";
    pub const PRECIPITATION: &str = "Precipitation";
    pub const HUMIDITY: &str = "Humidity";
    pub const WIND_SPEED: &str = "Wind Speed";
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
}

/// Source column to output field mapping, in output field order.
pub static FIELD_MAPPING: [(&str, &str); 11] = [
    (columns::DATE, "date"),
    (columns::COUNTRY, "country"),
    (columns::CONTINENT, "continent"),
    (columns::YEAR, "year"),
    (columns::MONTH, "month"),
    (columns::TEMPERATURE, "temperature"),
    (columns::CO2, "co2"),
    (columns::SEA_LEVEL, "sea_level"),
    (columns::PRECIPITATION, "precipitation"),
    (columns::HUMIDITY, "humidity"),
    (columns::WIND_SPEED, "wind_speed"),
];

/// Output field names of a [`NormalizedRecord`], in serialization order.
pub fn output_fields() -> impl Iterator<Item = &'static str> {
    FIELD_MAPPING.iter().map(|&(_, field)| field)
}

/// Source column names the transformer reads.
pub fn source_columns() -> impl Iterator<Item = &'static str> {
    FIELD_MAPPING.iter().map(|&(column, _)| column)
}

/// One unprocessed row from the source table.
///
/// Cells are kept as the raw text the reader produced. Columns missing from
/// the row (short rows, absent header) simply have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    cells: HashMap<String, String>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity),
        }
    }

    /// Sets a cell. The first value for a column wins, so duplicated header
    /// names resolve to the leftmost column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.entry(column.into()).or_insert_with(|| value.into());
    }

    /// Returns the raw text of a cell, if the column is present.
    #[inline]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Number of cells in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// One row of the dashboard output.
///
/// Field order here is the JSON key order. Optional fields serialize as
/// explicit `null` so every object carries the same key set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub date: Option<NaiveDate>,
    pub country: String,
    pub continent: Option<String>,
    pub year: i32,
    pub month: Option<u32>,
    pub temperature: f64,
    pub co2: Option<f64>,
    pub sea_level: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

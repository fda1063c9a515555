//! Climate dataset normalization pipeline.
//!
//! This crate turns the raw climate CSV export into the JSON document the
//! dashboard consumes:
//! - Loading the CSV into untyped rows keyed by header name
//! - Mapping, coercing, rounding and filtering each row into a fixed schema
//! - Writing the surviving records as one JSON array
//!
//! # Example
//!
//! ```no_run
//! use climate_pipeline::{core::loaders::load_raw_csv, processors::transform};
//!
//! let rows = load_raw_csv("climate_change_clean_data.csv").unwrap();
//! let records = transform(&rows);
//! println!("{} records", records.len());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{IoConfig, OutputConfig, PipelineConfig, ProcessingConfig};
pub use core::records::{NormalizedRecord, RawRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

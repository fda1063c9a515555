//! Core data types and I/O operations.

pub mod loaders;
pub mod records;
pub mod transforms;
pub mod writers;

pub use loaders::{load_raw_csv, read_raw_records, LoaderError};
pub use records::{NormalizedRecord, RawRecord};
pub use writers::{write_json, WriteError};

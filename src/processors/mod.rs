//! Data processing modules.

pub mod convert;
pub mod transformer;

// Re-export key types for convenience
pub use convert::{convert_csv_to_json, transform_csv, ConvertError, ConvertSummary};
pub use transformer::{
    normalize_row, transform, DropReason, MappedRow, RowOutcome, TransformOutput, TransformStats,
    Transformer,
};

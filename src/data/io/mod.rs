//! Dataset I/O utilities.
//!
//! This module provides loaders for tabular data files.

mod csv;
mod error;

pub use self::csv::{load_csv, load_csv_with_options, CsvOptions};
pub use self::error::DatasetLoadError;

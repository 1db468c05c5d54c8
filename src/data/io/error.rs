//! Shared error types for dataset I/O.

use std::io;

/// Errors that can occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file contains no data rows: {path}")]
    Empty { path: String },

    #[error("file contains no columns: {path}")]
    NoColumns { path: String },

    #[error("row {row} has {got} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("dataset construction failed: {0}")]
    Dataset(#[from] crate::data::DatasetError),
}

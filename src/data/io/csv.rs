//! CSV dataset loader.
//!
//! Imports delimited text files into a [`Dataset`], inferring a per-column
//! type: a column is numeric when every non-missing cell parses as a float,
//! and categorical otherwise. Categorical cells are label-encoded in
//! first-seen order and the level strings are kept on the schema. Missing
//! cells become `f32::NAN` in both cases.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use ndarray::Array1;

use super::error::DatasetLoadError;
use crate::data::{Dataset, DatasetBuilder};

/// Options controlling CSV parsing.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Treat the first row as column names. Defaults to `true`; without a
    /// header, columns are named `C1`..`Cn`.
    pub has_header: bool,
    /// Field delimiter. Defaults to `,`.
    pub delimiter: u8,
    /// Cell values (after trimming) treated as missing.
    pub na_strings: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            na_strings: ["", "NA", "na", "Na", "NaN", "nan"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Load a CSV file into a [`Dataset`] using default [`CsvOptions`].
///
/// The resulting frame carries no targets; use
/// [`Dataset::select_xy`] to pick feature and target columns for training.
///
/// # Errors
///
/// Returns [`DatasetLoadError`] on I/O failures, malformed CSV, ragged
/// rows, or files with no data.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, DatasetLoadError> {
    load_csv_with_options(path, &CsvOptions::default())
}

/// Load a CSV file into a [`Dataset`] with explicit options.
pub fn load_csv_with_options(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Dataset, DatasetLoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(file);

    let names: Option<Vec<String>> = if options.has_header {
        Some(reader.headers()?.iter().map(|s| s.trim().to_string()).collect())
    } else {
        None
    };

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    if records.is_empty() {
        return Err(DatasetLoadError::Empty {
            path: path.display().to_string(),
        });
    }

    let n_cols = names
        .as_ref()
        .map(|n| n.len())
        .unwrap_or_else(|| records[0].len());
    if n_cols == 0 {
        return Err(DatasetLoadError::NoColumns {
            path: path.display().to_string(),
        });
    }

    for (i, record) in records.iter().enumerate() {
        if record.len() != n_cols {
            return Err(DatasetLoadError::RaggedRow {
                row: i + 1 + usize::from(options.has_header),
                expected: n_cols,
                got: record.len(),
            });
        }
    }

    let mut builder = DatasetBuilder::new();
    for col in 0..n_cols {
        let name = column_name(&names, col);
        builder = match parse_column(&records, col, &options.na_strings) {
            ParsedColumn::Numeric(values) => {
                builder.add_feature(&name, Array1::from(values).view())
            }
            ParsedColumn::Categorical { codes, levels } => builder.add_categorical_with_levels(
                &name,
                Array1::from(codes).view(),
                levels,
            ),
        };
    }

    Ok(builder.build()?)
}

fn column_name(names: &Option<Vec<String>>, col: usize) -> String {
    match names {
        Some(names) if !names[col].is_empty() => names[col].clone(),
        _ => format!("C{}", col + 1),
    }
}

enum ParsedColumn {
    Numeric(Vec<f32>),
    Categorical { codes: Vec<f32>, levels: Vec<String> },
}

fn parse_column(
    records: &[csv::StringRecord],
    col: usize,
    na_strings: &[String],
) -> ParsedColumn {
    let is_missing = |cell: &str| na_strings.iter().any(|na| na == cell);

    let numeric = records.iter().all(|record| {
        let cell = record[col].trim();
        is_missing(cell) || cell.parse::<f64>().is_ok()
    });

    if numeric {
        let values = records
            .iter()
            .map(|record| {
                let cell = record[col].trim();
                if is_missing(cell) {
                    f32::NAN
                } else {
                    // Validated above.
                    cell.parse::<f64>().unwrap_or(f64::NAN) as f32
                }
            })
            .collect();
        return ParsedColumn::Numeric(values);
    }

    let mut level_ids: HashMap<String, u32> = HashMap::new();
    let mut levels: Vec<String> = Vec::new();
    let codes = records
        .iter()
        .map(|record| {
            let cell = record[col].trim();
            if is_missing(cell) {
                return f32::NAN;
            }
            let next_id = levels.len() as u32;
            let id = *level_ids.entry(cell.to_string()).or_insert_with(|| {
                levels.push(cell.to_string());
                next_id
            });
            id as f32
        })
        .collect();

    ParsedColumn::Categorical { codes, levels }
}

//! CSV Data Loader Module
//! Reads the crash dataset with Polars and hands the raw cells to the processor.

use super::processor::DataProcessor;
use super::record::CrashTable;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Dataset not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("Dataset has no columns")]
    Empty,
}

/// Spreadsheet null markers treated as missing in every column.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// Uncleaned cells, row-major, with the headers as they appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    #[cfg(test)]
    pub fn from_rows(headers: &[&str], rows: &[&[Option<&str>]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.map(str::to_string)).collect())
                .collect(),
        }
    }

    /// Read every column of a DataFrame as text, mapping null markers to `None`.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, PolarsError> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(df.width()); df.height()];

        for column in df.get_columns() {
            let as_text = column.cast(&DataType::String)?;
            let values = as_text.as_materialized_series().str()?;
            for (row, value) in rows.iter_mut().zip(values.into_iter()) {
                row.push(value.filter(|v| !is_null_token(v)).map(str::to_string));
            }
        }

        Ok(Self { headers, rows })
    }
}

/// Loads and cleans the crash dataset.
pub struct DataLoader;

impl DataLoader {
    /// Load and clean a CSV file from disk.
    pub fn load(path: &Path) -> Result<CrashTable, DataLoadError> {
        if !path.exists() {
            return Err(DataLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "reading dataset");

        Self::load_bytes(&bytes)
    }

    /// Parse and clean CSV bytes. No I/O.
    pub fn load_bytes(bytes: &[u8]) -> Result<CrashTable, DataLoadError> {
        let raw = Self::read_raw(bytes)?;
        debug!(
            columns = raw.headers.len(),
            rows = raw.rows.len(),
            "parsed raw table"
        );

        let table = DataProcessor::clean(raw);
        info!(rows = table.len(), "dataset cleaned");
        Ok(table)
    }

    /// Parse CSV bytes with every column read as text.
    pub fn read_raw(bytes: &[u8]) -> Result<RawTable, DataLoadError> {
        // A schema length of 0 keeps all columns as strings; coercion happens later
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        if df.width() == 0 {
            return Err(DataLoadError::Empty);
        }

        Ok(RawTable::from_dataframe(&df)?)
    }
}

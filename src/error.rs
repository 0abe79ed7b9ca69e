//! Error types for hiertt-forge operations.
//!
//! Defines error types for the three library subsystems:
//! - Dataset loading and saving
//! - HTML table parsing
//! - Workbook and GRP export

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dataset '{path}' must be a JSON array of objects")]
    NotAnArray { path: PathBuf },

    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index} has an invalid '{field}' field: {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while parsing HTML tables.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    /// No usable `<table>` was found. Callers treat this as "skip".
    #[error("No tables found")]
    NoTables,
}

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write workbook '{path}': {reason}")]
    Workbook { path: PathBuf, reason: String },

    #[error("Table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),

    #[error("Table has {0} rows, more than a worksheet can hold")]
    TooManyRows(usize),

    #[error("Failed to scan spreadsheet folder '{path}': {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn workbook(path: impl Into<PathBuf>, err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

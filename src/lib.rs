//! hiertt-forge: auxiliary artifact builder for MultiHiertt-style datasets.
//!
//! This library turns question-answering records that embed HTML tables into
//! per-table XLSX workbooks and flattened GRP task files for evaluation.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod grp;
pub mod tables;

// Re-export commonly used error types
pub use error::{DatasetError, ExportError, TableError};

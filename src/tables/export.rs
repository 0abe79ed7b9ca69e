//! Per-example table export.
//!
//! Every example gets its own `<out>/<uid>/` folder holding one workbook per
//! parsed table: `table{n}.xlsx`, or `table{n}_{k}.xlsx` when the n-th HTML
//! string yields more than one table.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::descriptions::extract_descriptions;
use super::html::parse_tables;
use super::xlsx::write_table_workbook;
use crate::dataset::{Example, UNKNOWN_UID};
use crate::error::{ExportError, TableError};

/// Workbook file name for sub-table `sub_idx` of `parsed` tables from HTML string `idx`.
pub fn workbook_file_name(idx: usize, sub_idx: usize, parsed: usize) -> String {
    if parsed == 1 {
        format!("table{idx}.xlsx")
    } else {
        format!("table{idx}_{sub_idx}.xlsx")
    }
}

/// What one example's export produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleExport {
    pub workbooks: Vec<PathBuf>,
    /// Indices of HTML strings that held no table, or a table too large for a worksheet.
    pub skipped: Vec<usize>,
}

/// Counts for one export run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportSummary {
    pub examples: usize,
    pub workbooks_written: usize,
    pub tables_skipped: usize,
    pub output_dir: PathBuf,
}

/// Writes the tables of each example to XLSX workbooks.
#[derive(Debug, Clone)]
pub struct TableExporter {
    out_dir: PathBuf,
    with_descriptions: bool,
}

impl TableExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            with_descriptions: false,
        }
    }

    /// Attach the `## Table k ##` paragraph text as a `description` sheet.
    pub fn with_descriptions(mut self, enabled: bool) -> Self {
        self.with_descriptions = enabled;
        self
    }

    /// Exports one example.
    pub fn export_example(&self, example: &Example) -> Result<ExampleExport, ExportError> {
        let uid = example.uid_or(UNKNOWN_UID);
        let example_dir = self.out_dir.join(uid);
        fs::create_dir_all(&example_dir)?;

        let descriptions = if self.with_descriptions {
            Some(extract_descriptions(&example.paragraphs))
        } else {
            None
        };

        let mut result = ExampleExport::default();
        for (idx, html) in example.tables.iter().enumerate() {
            let tables = match parse_tables(html) {
                Ok(tables) => tables,
                Err(TableError::NoTables) => {
                    tracing::warn!(uid = %uid, table = idx, "No tables parsed, skipping");
                    result.skipped.push(idx);
                    continue;
                }
            };

            let description = descriptions
                .as_ref()
                .map(|map| map.get(&idx).map(String::as_str).unwrap_or(""));

            for (sub_idx, table) in tables.iter().enumerate() {
                let path = example_dir.join(workbook_file_name(idx, sub_idx, tables.len()));
                match write_table_workbook(table, description, &path) {
                    Ok(()) => result.workbooks.push(path),
                    Err(e @ (ExportError::TooManyColumns(_) | ExportError::TooManyRows(_))) => {
                        tracing::warn!(
                            uid = %uid,
                            table = idx,
                            sub_table = sub_idx,
                            error = %e,
                            "Table too large for a worksheet, skipping"
                        );
                        if result.skipped.last() != Some(&idx) {
                            result.skipped.push(idx);
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(result)
    }

    /// Exports every example, continuing past unparsable or oversized tables.
    pub fn export_all(&self, examples: &[Example]) -> Result<ExportSummary, ExportError> {
        fs::create_dir_all(&self.out_dir)?;

        let mut summary = ExportSummary {
            output_dir: self.out_dir.clone(),
            ..ExportSummary::default()
        };

        for example in examples {
            let result = self.export_example(example)?;
            summary.examples += 1;
            summary.tables_skipped += result.skipped.len();
            summary.workbooks_written += result.workbooks.len();
        }

        tracing::info!(
            examples = summary.examples,
            workbooks = summary.workbooks_written,
            skipped = summary.tables_skipped,
            out = %self.out_dir.display(),
            "Table export finished"
        );

        Ok(summary)
    }
}

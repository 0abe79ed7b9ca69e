//! HTML table extraction and XLSX export.
//!
//! Parses the HTML table strings of each record, optionally pairs them with
//! the description text found between `## Table k ##` paragraph markers, and
//! writes one workbook per table.

pub mod descriptions;
pub mod export;
pub mod html;
pub mod xlsx;

pub use descriptions::{extract_descriptions, sanitize_for_excel, table_marker_index};
pub use export::{workbook_file_name, ExampleExport, ExportSummary, TableExporter};
pub use html::{parse_tables, CellValue, ParsedTable};
pub use xlsx::{write_table_workbook, DESCRIPTION_SHEET, PLAIN_SHEET, TABLE_SHEET};

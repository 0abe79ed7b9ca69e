//! XLSX workbook writer for parsed tables.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use super::descriptions::sanitize_for_excel;
use super::html::{CellValue, ParsedTable};
use crate::error::ExportError;

/// Sheet holding the table when a description sheet sits next to it.
pub const TABLE_SHEET: &str = "table";
/// Sheet holding the table in a workbook without a description.
pub const PLAIN_SHEET: &str = "Sheet1";
/// Sheet holding the description text.
pub const DESCRIPTION_SHEET: &str = "description";

const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

/// Writes `table` to a new workbook at `path`.
///
/// Without a description the workbook has a single `Sheet1`. With one, the
/// table goes to `table` and a second `description` sheet holds the text.
pub fn write_table_workbook(
    table: &ParsedTable,
    description: Option<&str>,
    path: &Path,
) -> Result<(), ExportError> {
    if table.width > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(table.width));
    }
    let total_rows = table.header.len() + table.body.len();
    if total_rows > MAX_ROWS {
        return Err(ExportError::TooManyRows(total_rows));
    }

    build_workbook(table, description, path).map_err(|e| ExportError::workbook(path, e))?;
    tracing::debug!(path = %path.display(), rows = total_rows, cols = table.width, "Wrote workbook");
    Ok(())
}

fn build_workbook(
    table: &ParsedTable,
    description: Option<&str>,
    path: &Path,
) -> Result<(), XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(if description.is_some() { TABLE_SHEET } else { PLAIN_SHEET })?;

    let mut row_num: u32 = 0;
    for row in &table.header {
        write_row(sheet, row_num, row, Some(&header_format))?;
        row_num += 1;
    }
    for row in &table.body {
        write_row(sheet, row_num, row, None)?;
        row_num += 1;
    }

    if let Some(text) = description {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DESCRIPTION_SHEET)?;
        sheet.write_string_with_format(0, 0, DESCRIPTION_SHEET, &header_format)?;
        let text = sanitize_for_excel(text);
        if !text.is_empty() {
            sheet.write_string(1, 0, &text)?;
        }
    }

    workbook.save(path)
}

fn write_row(
    sheet: &mut Worksheet,
    row_num: u32,
    cells: &[CellValue],
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        // Width was checked against the column limit, so this fits in u16.
        let col = col as u16;
        match (cell, format) {
            (CellValue::Number(n), Some(f)) => {
                sheet.write_number_with_format(row_num, col, *n, f)?;
            }
            (CellValue::Number(n), None) => {
                sheet.write_number(row_num, col, *n)?;
            }
            (CellValue::Text(s), Some(f)) => {
                sheet.write_string_with_format(row_num, col, sanitize_for_excel(s), f)?;
            }
            (CellValue::Text(s), None) => {
                sheet.write_string(row_num, col, sanitize_for_excel(s))?;
            }
            (CellValue::Empty, Some(f)) => {
                sheet.write_blank(row_num, col, f)?;
            }
            (CellValue::Empty, None) => {}
        }
    }
    Ok(())
}

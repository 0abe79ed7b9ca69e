//! HTML table parsing.
//!
//! Turns every `<table>` in an HTML fragment into a rectangular grid of
//! header and body cells. Spanned cells are repeated into each slot they
//! cover, empty or NA-like cells become [`CellValue::Empty`], and body
//! columns whose values are all numeric are typed as numbers.

use std::collections::{BTreeMap, HashMap};

use scraper::{ElementRef, Html, Selector};

use crate::error::TableError;

/// Strings read as missing values, mirroring the usual dataframe NA markers.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Largest `colspan` honoured, as in the HTML parsing algorithm.
pub const MAX_COLSPAN: usize = 1000;
/// Largest `rowspan` honoured.
pub const MAX_ROWSPAN: usize = 65534;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

/// A parsed table: header rows over body rows, all `width` cells wide.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub header: Vec<Vec<CellValue>>,
    pub body: Vec<Vec<CellValue>>,
    pub width: usize,
}

#[cfg(test)]
impl ParsedTable {
    /// Column labels when the table has exactly one header row.
    fn column_names(&self) -> Option<Vec<String>> {
        match self.header.as_slice() {
            [row] => Some(
                row.iter()
                    .map(|cell| match cell {
                        CellValue::Number(n) => n.to_string(),
                        CellValue::Text(s) => s.clone(),
                        CellValue::Empty => String::new(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct RawCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

type RawRow = Vec<RawCell>;

/// Parses every table in `html`.
///
/// Returns [`TableError::NoTables`] when the fragment holds no table with at
/// least one cell.
pub fn parse_tables(html: &str) -> Result<Vec<ParsedTable>, TableError> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse("table").expect("Invalid CSS selector");

    let tables: Vec<ParsedTable> = fragment
        .select(&selector)
        .filter_map(parse_table)
        .collect();

    if tables.is_empty() {
        return Err(TableError::NoTables);
    }
    Ok(tables)
}

fn parse_table(table: ElementRef<'_>) -> Option<ParsedTable> {
    let mut thead_rows = Vec::new();
    let mut body_rows = Vec::new();
    let mut tfoot_rows = Vec::new();

    for child in child_elements(table) {
        match child.value().name() {
            "thead" => thead_rows.extend(rows_of(child)),
            "tbody" => body_rows.extend(rows_of(child)),
            "tfoot" => tfoot_rows.extend(rows_of(child)),
            "tr" => body_rows.push(read_row(child)),
            _ => {}
        }
    }

    // Without a <thead>, leading all-<th> rows act as the header.
    let header_rows: Vec<RawRow> = if thead_rows.is_empty() {
        let leading = body_rows
            .iter()
            .take_while(|row| !row.is_empty() && row.iter().all(|c| c.is_header))
            .count();
        body_rows.drain(..leading).collect()
    } else {
        thead_rows
    };
    body_rows.extend(tfoot_rows);

    let header_grid = expand_spans(&header_rows);
    let body_grid = expand_spans(&body_rows);

    let width = header_grid
        .iter()
        .chain(body_grid.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    if width == 0 {
        return None;
    }

    let header = if header_grid.is_empty() {
        vec![(0..width).map(|i| CellValue::Number(i as f64)).collect()]
    } else if header_grid.len() == 1 {
        vec![label_columns(&header_grid[0], width)]
    } else {
        header_grid
            .iter()
            .map(|row| padded(row, width).into_iter().map(text_cell).collect())
            .collect()
    };

    let body = type_columns(&body_grid, width);

    Some(ParsedTable {
        header,
        body,
        width,
    })
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn rows_of(section: ElementRef<'_>) -> Vec<RawRow> {
    child_elements(section)
        .filter(|el| el.value().name() == "tr")
        .map(read_row)
        .collect()
}

fn read_row(row: ElementRef<'_>) -> RawRow {
    child_elements(row)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|cell| RawCell {
            text: collapse_whitespace(&cell.text().collect::<String>()),
            is_header: cell.value().name() == "th",
            colspan: span_attr(cell, "colspan"),
            rowspan: span_attr(cell, "rowspan"),
        })
        .collect()
}

/// Reads a span attribute, clamped to the limits browsers apply.
fn span_attr(cell: ElementRef<'_>, name: &str) -> usize {
    let max = if name == "rowspan" { MAX_ROWSPAN } else { MAX_COLSPAN };
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expands `colspan`/`rowspan` into a grid of plain strings.
///
/// Cells still spanning down after the last row produce extra rows.
fn expand_spans(rows: &[RawRow]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(rows.len());
    // column -> (text, rows still to fill)
    let mut pending: BTreeMap<usize, (String, usize)> = BTreeMap::new();

    for row in rows {
        let mut out: Vec<String> = Vec::new();
        let mut next_pending = BTreeMap::new();
        let mut cells = row.iter();

        loop {
            // Carried cells at or left of the cursor, including ones a colspan jumped over.
            while pending.first_key_value().is_some_and(|(&col, _)| col <= out.len()) {
                let Some((_, (text, remaining))) = pending.pop_first() else { break };
                if remaining > 1 {
                    next_pending.insert(out.len(), (text.clone(), remaining - 1));
                }
                out.push(text);
            }

            let Some(cell) = cells.next() else { break };
            for _ in 0..cell.colspan {
                if cell.rowspan > 1 {
                    next_pending.insert(out.len(), (cell.text.clone(), cell.rowspan - 1));
                }
                out.push(cell.text.clone());
            }
        }

        // Spans that sit past the end of this row's own cells.
        for (_, (text, remaining)) in std::mem::take(&mut pending) {
            if remaining > 1 {
                next_pending.insert(out.len(), (text.clone(), remaining - 1));
            }
            out.push(text);
        }

        grid.push(out);
        pending = next_pending;
    }

    while !pending.is_empty() {
        let mut out = Vec::new();
        let mut next_pending = BTreeMap::new();
        for (_, (text, remaining)) in std::mem::take(&mut pending) {
            if remaining > 1 {
                next_pending.insert(out.len(), (text.clone(), remaining - 1));
            }
            out.push(text);
        }
        grid.push(out);
        pending = next_pending;
    }

    grid
}

fn padded(row: &[String], width: usize) -> Vec<String> {
    let mut row = row.to_vec();
    row.resize(width, String::new());
    row
}

fn text_cell(text: String) -> CellValue {
    if text.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(text)
    }
}

/// Single header row: blanks become `Unnamed: i`, repeats get `.1`, `.2`, ...
fn label_columns(row: &[String], width: usize) -> Vec<CellValue> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    padded(row, width)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let label = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            CellValue::Text(label)
        })
        .collect()
}

fn is_missing(text: &str) -> bool {
    NA_VALUES.contains(&text)
}

/// Parses a numeric cell, accepting `,` as a thousands separator.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn type_columns(grid: &[Vec<String>], width: usize) -> Vec<Vec<CellValue>> {
    let rows: Vec<Vec<String>> = grid.iter().map(|row| padded(row, width)).collect();

    let numeric: Vec<bool> = (0..width)
        .map(|col| {
            rows.iter()
                .map(|row| row[col].as_str())
                .filter(|text| !is_missing(text))
                .all(|text| parse_number(text).is_some())
        })
        .collect();

    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, text)| {
                    if is_missing(&text) {
                        CellValue::Empty
                    } else if numeric[col] {
                        parse_number(&text).map_or(CellValue::Text(text), CellValue::Number)
                    } else {
                        CellValue::Text(text)
                    }
                })
                .collect()
        })
        .collect()
}

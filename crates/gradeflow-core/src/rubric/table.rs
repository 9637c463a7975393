//! Raw rubric tables
//!
//! A rubric source is a sequence of rows mapping column labels to cells.
//! JSON sources are arrays of row objects (the "records" shape spreadsheet
//! tools export); YAML sources are sequences of mappings. CSV files and
//! spreadsheet workbooks use their header row as the column labels.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::Deserialize;

use crate::bail_schema;
use crate::error::{GradeError, Result};

/// One cell of a rubric table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Empty,
}

impl Cell {
    /// Render the cell as text. Null cells have no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Integer(n) => Some(n.to_string()),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", *f as i64))
            }
            Cell::Float(f) => Some(f.to_string()),
            Cell::Flag(b) => Some(b.to_string()),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// A single table row keyed by column label
pub type Row = BTreeMap<String, Cell>;

/// Column labels present anywhere in the table.
///
/// Labels of the first row come first, then labels first seen in later rows.
/// Within one row labels are in `Row` (sorted) order.
pub fn column_labels(rows: &[Row]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for row in rows {
        for label in row.keys() {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.clone());
            }
        }
    }
    labels
}

/// Read the rows of a rubric table, choosing the decoder by file extension
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let source_name = source_label(path);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    fs::metadata(path).map_err(|e| GradeError::io_operation("read rubric", path.display(), e))?;

    match extension.as_deref() {
        Some("json") => rows_or_schema(&source_name, serde_json::from_str(&read_text(path)?)),
        Some("yaml") | Some("yml") => {
            rows_or_schema(&source_name, serde_yaml::from_str(&read_text(path)?))
        }
        Some("csv") => read_csv(&source_name, &read_text(path)?),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => {
            read_workbook(&source_name, path)
        }
        Some(other) => bail_schema!(
            source_name,
            "unsupported rubric format '.{}' (supported: .json, .yaml, .yml, .csv, .xlsx, .xls, .ods)",
            other
        ),
        None => bail_schema!(source_name, "rubric file has no extension"),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| GradeError::io_operation("read rubric", path.display(), e))
}

/// A document that does not decode into rows is a schema problem, not an I/O one
fn rows_or_schema<E: fmt::Display>(
    source_name: &str,
    decoded: std::result::Result<Vec<Row>, E>,
) -> Result<Vec<Row>> {
    decoded.map_err(|e| GradeError::schema(source_name, format!("not a table of rows: {}", e)))
}

/// Header labels, keeping the column position of blank labels as `None`
fn header_labels<I, S>(source_name: &str, cells: I) -> Result<Vec<Option<String>>>
where
    I: IntoIterator<Item = Option<S>>,
    S: Into<String>,
{
    let labels: Vec<Option<String>> = cells
        .into_iter()
        .map(|label| label.map(Into::<String>::into).filter(|l| !l.trim().is_empty()))
        .collect();

    let mut seen = HashSet::new();
    for label in labels.iter().flatten() {
        if !seen.insert(label.as_str()) {
            bail_schema!(source_name, "duplicate column '{}'", label);
        }
    }
    Ok(labels)
}

fn text_cell(field: &str) -> Cell {
    if field.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(field.to_string())
    }
}

/// CSV with a header row. Blank fields are absent cells.
fn read_csv(source_name: &str, content: &str) -> Result<Vec<Row>> {
    let csv_error = |e: csv::Error| GradeError::schema(source_name, format!("not a CSV table: {}", e));

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = header_labels(
        source_name,
        reader.headers().map_err(csv_error)?.iter().map(Some),
    )?;

    reader
        .records()
        .map(|record| {
            let record = record.map_err(csv_error)?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .filter_map(|(label, field)| label.as_ref().map(|l| (l.clone(), text_cell(field))))
                .collect();
            Ok(row)
        })
        .collect()
}

/// First sheet of a spreadsheet workbook; its first used row is the header
fn read_workbook(source_name: &str, path: &Path) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        GradeError::schema(source_name, format!("not a readable workbook: {}", e))
    })?;
    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => bail_schema!(source_name, "cannot read the first sheet: {}", e),
        None => bail_schema!(source_name, "workbook has no sheets"),
    };

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers = header_labels(
        source_name,
        header.iter().map(|cell| workbook_cell(cell).as_text()),
    )?;

    Ok(sheet_rows
        .map(|cells| -> Row {
            headers
                .iter()
                .zip(cells)
                .filter_map(|(label, cell)| {
                    label.as_ref().map(|l| (l.clone(), workbook_cell(cell)))
                })
                .collect()
        })
        .collect())
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        Data::Int(n) => Cell::Integer(*n),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Flag(*b),
        Data::Error(_) | Data::Empty => Cell::Empty,
        other => text_cell(&other.to_string()),
    }
}

/// Display label for a rubric source: its file name
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Spreadsheet loading via calamine
//!
//! Converts every worksheet into a [`Sheet`]. Date-formatted cells become
//! their numeric serial so the date parser sees one representation.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::sheet::{Cell, Row, Sheet};

/// Read all worksheets of an xlsx/xls/ods file, in workbook order
pub fn read_workbook(path: &Path) -> ImportResult<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ImportError::Workbook(format!("Failed to open {}: {}", path.display(), e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ImportError::Workbook(format!("Failed to read sheet {}: {}", name, e)))?;
        let rows = range_to_rows(&range);
        debug!("Read sheet {} ({} rows)", name, rows.len());
        sheets.push(Sheet::new(name, rows));
    }

    Ok(sheets)
}

/// Rows of the used range, first row being the header
pub fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect()
}

pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

//! Spreadsheet reading through calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tender_model::{CellValue, RawGrid};

use crate::error::{IngestError, Result};

/// Reads the first worksheet of an in-memory workbook.
///
/// Calamine ranges start at the first used cell, so leading empty rows and
/// columns are restored to keep row indices aligned with the sheet.
pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    let (start_row, start_col) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(cell_value));
        while cells.last().is_some_and(CellValue::is_blank) {
            cells.pop();
        }
        rows.push(cells);
    }
    Ok(RawGrid::new(rows))
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(value) => CellValue::text(value.as_str()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        other => CellValue::text(other.to_string()),
    }
}

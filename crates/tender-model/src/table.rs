//! A worksheet after its header row has been promoted to column labels.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// A data row with its position in the original grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub origin_index: usize,
    pub cells: Vec<CellValue>,
}

/// Column labels (unique, non-empty) plus the data rows below the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderTable {
    pub header_row: usize,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl TenderTable {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }

    /// The cell of `row` under `label`, or an empty cell when either is absent.
    pub fn cell<'a>(&self, row: &'a TableRow, label: &str) -> &'a CellValue {
        self.column_index(label)
            .and_then(|idx| row.cells.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

//! Header promotion: turning a located header row into column labels.

use std::collections::BTreeSet;

use tender_model::{CellValue, RawGrid, TableRow, TenderTable};
use tender_normalization::collapse_whitespace;

/// Promotes row `header_row` of `grid` to column labels.
///
/// Labels are trimmed and whitespace-collapsed; blank labels become
/// `Column{n}` (1-based position) and repeated labels get `.1`, `.2`
/// suffixes. Rows below the header that are entirely blank are dropped, the
/// rest are padded or truncated to the header width and keep their grid row
/// index as `origin_index`.
pub fn promote_header(grid: &RawGrid, header_row: usize) -> TenderTable {
    let width = grid.width();
    let header = grid.row(header_row).unwrap_or(&[]);
    let columns = unique_labels(header, width);

    let rows = grid
        .rows()
        .iter()
        .enumerate()
        .skip(header_row + 1)
        .filter(|(_, row)| !row.iter().all(CellValue::is_blank))
        .map(|(origin_index, row)| {
            let mut cells: Vec<CellValue> = row.iter().take(width).cloned().collect();
            cells.resize(width, CellValue::Empty);
            TableRow {
                origin_index,
                cells,
            }
        })
        .collect();

    TenderTable {
        header_row,
        columns,
        rows,
    }
}

fn unique_labels(header: &[CellValue], width: usize) -> Vec<String> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    (0..width)
        .map(|idx| {
            let raw = header
                .get(idx)
                .map(|cell| collapse_whitespace(&cell.to_text()))
                .unwrap_or_default();
            let base = if raw.is_empty() {
                format!("Column{}", idx + 1)
            } else {
                raw
            };
            let mut label = base.clone();
            let mut suffix = 0usize;
            while used.contains(&label) {
                suffix += 1;
                label = format!("{base}.{suffix}");
            }
            used.insert(label.clone());
            label
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_header_and_keeps_origin_indices() {
        let grid = RawGrid::from_text_rows(vec![
            vec!["BỆNH VIỆN A"],
            vec!["Hoạt chất", "Số lượng", ""],
            vec!["Paracetamol", "100", "x"],
            vec!["", "", ""],
            vec!["Ibuprofen"],
        ]);
        let table = promote_header(&grid, 1);
        assert_eq!(table.header_row, 1);
        assert_eq!(table.columns, vec!["Hoạt chất", "Số lượng", "Column3"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows[0].origin_index, 2);
        assert_eq!(table.rows[1].origin_index, 4);
        assert_eq!(table.rows[1].cells.len(), 3);
        assert!(table.rows[1].cells[2].is_blank());
    }

    #[test]
    fn duplicate_labels_get_numeric_suffixes() {
        let grid = RawGrid::from_text_rows(vec![vec!["Nhóm", "Nhóm", " Nhóm "]]);
        let table = promote_header(&grid, 0);
        assert_eq!(table.columns, vec!["Nhóm", "Nhóm.1", "Nhóm.2"]);
        assert!(table.rows.is_empty());

        let grid = RawGrid::from_text_rows(vec![vec!["A", "A.1", "A"]]);
        assert_eq!(promote_header(&grid, 0).columns, vec!["A", "A.1", "A.2"]);
    }

    #[test]
    fn header_beyond_grid_yields_empty_table() {
        let grid = RawGrid::from_text_rows(vec![vec!["a"]]);
        let table = promote_header(&grid, 5);
        assert_eq!(table.columns, vec!["Column1"]);
        assert_eq!(table.height(), 0);
    }
}

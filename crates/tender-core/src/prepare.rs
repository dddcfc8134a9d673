//! Shared first stages for every input table: header, promotion, mapping.

use tracing::{debug, warn};

use tender_ingest::{HeaderLocator, promote_header};
use tender_map::ColumnMapper;
use tender_model::{
    ColumnMapping, HeaderLocation, RawGrid, ReconcileError, ReconcileOptions, Result, TableKind,
    TenderTable,
};

/// A grid after header detection, promotion and column mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTable {
    pub kind: TableKind,
    pub location: HeaderLocation,
    pub table: TenderTable,
    pub mapping: ColumnMapping,
}

/// Locates the header of `grid`, promotes it and maps the columns `kind` requires.
pub fn prepare_table(
    grid: &RawGrid,
    kind: TableKind,
    options: &ReconcileOptions,
) -> Result<PreparedTable> {
    let locator = HeaderLocator::for_table(kind, options);
    let location = locator.locate(grid);
    let Some(header_row) = location.row_index() else {
        warn!(table = %kind, scanned = locator.scan_len(grid), "no header row found");
        return Err(ReconcileError::HeaderNotFound {
            table: kind,
            scanned: locator.scan_len(grid),
        });
    };

    let table = promote_header(grid, header_row);
    let mapping = ColumnMapper::new().map_table(kind, &table)?;
    debug!(
        table = %kind,
        header = %location.describe(),
        columns = table.width(),
        rows = table.height(),
        "prepared table"
    );
    Ok(PreparedTable {
        kind,
        location,
        table,
        mapping,
    })
}

//! CSV reading into a raw grid.

use tender_model::{CellValue, RawGrid};

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses CSV bytes without assuming a header row.
///
/// Records may have different lengths. Every field becomes a text cell (blank
/// fields become [`CellValue::Empty`]); numeric coercion happens later.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<RawGrid> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(CellValue::text).collect());
    }
    Ok(RawGrid::new(rows))
}

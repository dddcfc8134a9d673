//! Readers turning tabular files into headerless [`RawGrid`]s.
//!
//! CSV goes through the `csv` crate with headers disabled and ragged records
//! allowed; workbooks go through `calamine` and only the first worksheet is
//! read.

mod delimited;
mod workbook;

use std::path::Path;

use tender_model::RawGrid;
use tracing::debug;

use crate::error::{IngestError, Result};

pub use self::delimited::read_csv_bytes;
pub use self::workbook::read_workbook_bytes;

/// Tabular file formats the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Any spreadsheet calamine can open (`xlsx`, `xlsm`, `xls`, `xlsb`, `ods`).
    Workbook,
}

impl SourceFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx" | "xlsm" | "xls" | "xlsb" | "ods") => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Workbook => "workbook",
        }
    }
}

/// Reads the raw bytes of `path`.
pub fn read_source_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Parses in-memory file contents of the given format.
pub fn read_grid_bytes(bytes: &[u8], format: SourceFormat) -> Result<RawGrid> {
    match format {
        SourceFormat::Csv => read_csv_bytes(bytes),
        SourceFormat::Workbook => read_workbook_bytes(bytes.to_vec()),
    }
}

/// Reads a file into a [`RawGrid`], choosing the reader by extension.
pub fn read_grid(path: &Path) -> Result<RawGrid> {
    let format = SourceFormat::from_path(path)?;
    let bytes = read_source_bytes(path)?;
    let grid = read_grid_bytes(&bytes, format)?;
    debug!(
        path = %path.display(),
        format = format.as_str(),
        rows = grid.len(),
        columns = grid.width(),
        "read source grid"
    );
    Ok(grid)
}

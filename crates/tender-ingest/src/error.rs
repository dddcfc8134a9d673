//! Error types for reading tender and reference files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a file into a [`tender_model::RawGrid`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported tabular format.
    #[error("unsupported file format for {path} (expected .csv, .xlsx, .xls, .xlsb or .ods)")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV: {message}")]
    CsvParse { message: String },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook: {source}")]
    Workbook {
        #[source]
        source: calamine::Error,
    },

    /// Workbook has no worksheet to read.
    #[error("workbook has no worksheets")]
    EmptyWorkbook,
}

impl From<calamine::Error> for IngestError {
    fn from(source: calamine::Error) -> Self {
        Self::Workbook { source }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/tender.xlsx"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/tender.xlsx");

        let err = IngestError::UnsupportedFormat {
            path: PathBuf::from("tender.pdf"),
        };
        assert!(err.to_string().starts_with("unsupported file format for tender.pdf"));
    }
}

//! Tender ingestion: from files to promoted tables.
//!
//! - [`reader`]: CSV and workbook readers producing headerless [`tender_model::RawGrid`]s
//! - [`header`]: keyword-scored header row detection
//! - [`table`]: promotion of the detected header row to column labels

pub mod error;
pub mod header;
pub mod reader;
pub mod table;

pub use error::{IngestError, Result};
pub use header::{
    DEFAULT_VOCABULARY, HeaderLocator, KeywordGroup, default_anchors, locate_header,
};
pub use reader::{SourceFormat, read_grid, read_grid_bytes, read_source_bytes};
pub use table::promote_header;

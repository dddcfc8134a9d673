//! Data model for tender catalog reconciliation.
//!
//! Types shared by every stage of the pipeline: raw grids, header detection
//! results, column mappings, the rows flowing from tender to reconciled
//! output, run options and the error taxonomy.

pub mod cell;
pub mod error;
pub mod field;
pub mod header;
pub mod mapping;
pub mod options;
pub mod records;
pub mod table;

pub use cell::{CellValue, RawGrid, format_numeric};
pub use error::{OptionsError, ReconcileError, Result};
pub use field::{CanonicalField, TableKind};
pub use header::{HeaderCandidate, HeaderLocation};
pub use mapping::{ColumnMapping, FieldAssignment};
pub use options::{
    DEFAULT_HEADER_SCAN_WINDOW, DEFAULT_SUGGESTION_MULTIPLIER, HeaderStrategy, ReconcileOptions,
};
pub use records::{AccountEntry, CatalogEntry, PeerGroupMap, ReconciledRow, TenderRow};
pub use table::{TableRow, TenderTable};

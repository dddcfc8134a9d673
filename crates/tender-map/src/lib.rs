//! Column mapping and record extraction.
//!
//! Labels of a promoted [`tender_model::TenderTable`] are classified with an
//! ordered rule table ([`rules::COLUMN_RULES`]); the resulting
//! [`tender_model::ColumnMapping`] then drives extraction of tender rows,
//! catalog entries, peer groups and account entries.

pub mod extract;
pub mod mapper;
pub mod rules;

pub use extract::{
    FieldCells, TenderRows, account_entries, catalog_entries, peer_group_map, tender_rows,
};
pub use mapper::{ColumnMapper, map_columns};
pub use rules::{COLUMN_RULES, ColumnRule};

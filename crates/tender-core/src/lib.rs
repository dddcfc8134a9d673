//! Core reconciliation engine.
//!
//! - [`pipeline`]: the end-to-end run producing a [`Reconciliation`]
//! - [`reference`] and [`cache`]: reference data and its process-wide cache
//! - [`scope`]: restricting a tender to hospitals from the account reference
//! - [`weights`]: peer-group totals and per-row ratios
//! - [`report`]: value, hospital and deployment-suggestion reports
//! - [`frame`]: polars views of rows and reports

pub mod cache;
pub mod frame;
pub mod pipeline;
pub mod prepare;
pub mod reference;
pub mod report;
pub mod scope;
pub mod weights;

pub use cache::{ReferenceCache, SourceId};
pub use frame::{
    APPENDED_COLUMNS, hospital_summary_frame, ingredient_value_frame, output_columns,
    reconciled_frame, suggestion_frame,
};
pub use pipeline::{Diagnostics, Reconciliation, reconcile, reconcile_with_scope};
pub use prepare::{PreparedTable, prepare_table};
pub use reference::ReferenceData;
pub use report::{
    DeploymentSuggestion, HospitalSummary, IngredientValue, deployment_suggestions,
    format_amount, hospital_summary, is_suspended, value_by_ingredient,
};
pub use scope::{AccountScope, ScopedRows, apply_scope};
pub use weights::{PeerWeights, Weighted, apply_peer_weights, format_ratio, peer_group_ratios};

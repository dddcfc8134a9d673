//! Error taxonomy for a reconciliation run.
//!
//! Only the two variants here halt the pipeline. Numeric coercion failures and
//! unmatched rows are absorbed with documented fallbacks and never surface as
//! errors.

use thiserror::Error;

use crate::field::{CanonicalField, TableKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// No row in the scan window met the keyword threshold.
    #[error("could not find a header row in the first {scanned} rows of the {table} table")]
    HeaderNotFound { table: TableKind, scanned: usize },

    /// Mandatory canonical fields are absent after column mapping.
    #[error("{table} table is missing required columns: {}", join_fields(.fields))]
    MissingRequiredColumn {
        table: TableKind,
        fields: Vec<CanonicalField>,
    },
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .copied()
        .map(CanonicalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors from loading [`crate::ReconcileOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid option {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReconcileError::HeaderNotFound {
            table: TableKind::Tender,
            scanned: 20,
        };
        assert_eq!(
            err.to_string(),
            "could not find a header row in the first 20 rows of the tender table"
        );

        let err = ReconcileError::MissingRequiredColumn {
            table: TableKind::Catalog,
            fields: vec![CanonicalField::Strength, CanonicalField::ProductName],
        };
        assert_eq!(
            err.to_string(),
            "catalog table is missing required columns: Strength, ProductName"
        );
    }
}

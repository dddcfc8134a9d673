//! Column label to canonical field mapping.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};
use crate::field::{CanonicalField, TableKind};

/// A label classified by the rule at position `priority` in the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: CanonicalField,
    pub priority: usize,
}

/// Mapping from observed column labels to canonical fields.
///
/// When several labels resolve to the same field, the label matched by the
/// highest-priority rule (lowest index) wins, ties broken by label order, so
/// the result never depends on column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    assignments: BTreeMap<String, FieldAssignment>,
    unmapped: BTreeSet<String>,
}

impl ColumnMapping {
    pub fn new(
        assignments: BTreeMap<String, FieldAssignment>,
        unmapped: BTreeSet<String>,
    ) -> Self {
        Self {
            assignments,
            unmapped,
        }
    }

    pub fn field_for(&self, label: &str) -> Option<CanonicalField> {
        self.assignments.get(label).map(|assignment| assignment.field)
    }

    /// The label chosen for `field`, if any column resolved to it.
    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.assignments
            .iter()
            .filter(|(_, assignment)| assignment.field == field)
            .min_by(|(label_a, a), (label_b, b)| {
                a.priority.cmp(&b.priority).then_with(|| label_a.cmp(label_b))
            })
            .map(|(label, _)| label.as_str())
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.column_for(field).is_some()
    }

    /// Canonical field for each selected column, keyed by field.
    pub fn resolved(&self) -> BTreeMap<CanonicalField, &str> {
        CanonicalField::ALL
            .iter()
            .filter_map(|field| self.column_for(*field).map(|label| (*field, label)))
            .collect()
    }

    pub fn unmapped(&self) -> impl Iterator<Item = &str> {
        self.unmapped.iter().map(String::as_str)
    }

    pub fn assignments(&self) -> impl Iterator<Item = (&str, FieldAssignment)> {
        self.assignments
            .iter()
            .map(|(label, assignment)| (label.as_str(), *assignment))
    }

    /// Fails with every missing field listed when any of `fields` is unresolved.
    pub fn require(&self, table: TableKind, fields: &[CanonicalField]) -> Result<()> {
        let missing: Vec<CanonicalField> = fields
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReconcileError::MissingRequiredColumn {
                table,
                fields: missing,
            })
        }
    }
}

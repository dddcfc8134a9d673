//! Column label classification.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use tender_model::{ColumnMapping, FieldAssignment, Result, TableKind, TenderTable};
use tender_normalization::fold_compact;

use crate::rules::{COLUMN_RULES, ColumnRule};

/// Classifies labels against an ordered rule table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapper {
    rules: &'static [ColumnRule],
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnMapper {
    pub fn new() -> Self {
        Self {
            rules: COLUMN_RULES,
        }
    }

    pub fn with_rules(rules: &'static [ColumnRule]) -> Self {
        Self { rules }
    }

    /// First rule whose pattern occurs in the compact folded label.
    pub fn classify(&self, label: &str) -> Option<FieldAssignment> {
        let compact = fold_compact(label);
        if compact.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| compact.contains(rule.pattern))
            .map(|(priority, rule)| FieldAssignment {
                field: rule.field,
                priority,
            })
    }

    /// Classifies every label independently of its position.
    pub fn map<S: AsRef<str>>(&self, labels: &[S]) -> ColumnMapping {
        let mut assignments = BTreeMap::new();
        let mut unmapped = BTreeSet::new();
        for label in labels {
            let label = label.as_ref();
            match self.classify(label) {
                Some(assignment) => {
                    assignments.insert(label.to_string(), assignment);
                }
                None => {
                    unmapped.insert(label.to_string());
                }
            }
        }
        ColumnMapping::new(assignments, unmapped)
    }

    /// Maps a promoted table and checks the fields `table` requires.
    pub fn map_table(&self, kind: TableKind, table: &TenderTable) -> Result<ColumnMapping> {
        let mapping = self.map(&table.columns);
        for (field, label) in mapping.resolved() {
            debug!(table = %kind, %field, column = label, "mapped column");
        }
        mapping.require(kind, kind.required_fields())?;
        Ok(mapping)
    }
}

/// Maps labels with the default rule table.
pub fn map_columns<S: AsRef<str>>(labels: &[S]) -> ColumnMapping {
    ColumnMapper::new().map(labels)
}

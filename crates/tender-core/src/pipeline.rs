//! One synchronous reconciliation run.
//!
//! Stages run in a fixed order, each in its own span:
//!
//! 1. header detection and promotion of the tender grid
//! 2. column mapping (ActiveIngredient and Strength are required)
//! 3. extraction of tender rows with normalized keys
//! 4. optional account scope, keeping rows for the selected hospitals
//! 5. catalog join and account enrichment
//! 6. peer-group weighting over the full export set

use std::time::Instant;

use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;
use tracing::{debug, info, info_span};

use tender_map::tender_rows;
use tender_match::{MatchStats, enrich_accounts, match_catalog};
use tender_model::{
    ColumnMapping, HeaderLocation, RawGrid, ReconcileOptions, ReconciledRow, Result, TableKind,
};

use crate::frame::{output_columns, reconciled_frame};
use crate::prepare::prepare_table;
use crate::reference::ReferenceData;
use crate::report::{
    DeploymentSuggestion, HospitalSummary, IngredientValue, deployment_suggestions,
    hospital_summary, value_by_ingredient,
};
use crate::scope::{AccountScope, ScopedRows, apply_scope};
use crate::weights::apply_peer_weights;

/// What happened during a run, for display next to the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub header: HeaderLocation,
    pub mapping: ColumnMapping,
    pub unmapped_columns: Vec<String>,
    /// Data rows extracted from the tender, before any account scope.
    pub tender_rows: usize,
    /// Rows dropped by the account scope; `None` when no scope was applied.
    pub scope_excluded: Option<usize>,
    pub export_rows: usize,
    pub display_rows: usize,
    pub match_stats: MatchStats,
    /// Quantity cells that were blank or non-numeric and counted as 0,
    /// over all extracted rows.
    pub quantity_fallbacks: usize,
}

/// Result of [`reconcile`]: every tender row once, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    columns: Vec<String>,
    rows: Vec<ReconciledRow>,
    diagnostics: Diagnostics,
}

impl Reconciliation {
    /// Promoted tender column labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Tender columns followed by the appended result columns.
    pub fn output_columns(&self) -> Vec<String> {
        output_columns(&self.columns)
    }

    /// All rows, matched or not.
    pub fn export_rows(&self) -> &[ReconciledRow] {
        &self.rows
    }

    /// Matched rows only.
    pub fn display_rows(&self) -> impl Iterator<Item = &ReconciledRow> {
        self.rows.iter().filter(|row| row.is_matched())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn export_frame(&self) -> PolarsResult<DataFrame> {
        reconciled_frame(&self.columns, &self.rows)
    }

    pub fn display_frame(&self) -> PolarsResult<DataFrame> {
        reconciled_frame(&self.columns, self.display_rows())
    }

    /// Value totals per ingredient over the display view.
    pub fn value_by_ingredient(&self) -> Vec<IngredientValue> {
        value_by_ingredient(self.display_rows())
    }

    /// Quantity and value per hospital and ingredient over the export view.
    pub fn hospital_summary(&self) -> Vec<HospitalSummary> {
        hospital_summary(&self.rows)
    }

    pub fn deployment_suggestions(
        &self,
        reference: &ReferenceData,
        multiplier: f64,
    ) -> Vec<DeploymentSuggestion> {
        deployment_suggestions(
            &reference.accounts,
            &self.rows,
            &reference.peer_groups,
            multiplier,
        )
    }
}

/// Reconciles a tender grid against reference data.
///
/// Fails only when the tender has no detectable header or lacks the
/// ActiveIngredient or Strength column.
pub fn reconcile(
    tender: &RawGrid,
    reference: &ReferenceData,
    options: &ReconcileOptions,
) -> Result<Reconciliation> {
    reconcile_with_scope(tender, reference, options, None)
}

/// [`reconcile`], first restricting the tender to the hospitals `scope`
/// selects from the account reference.
///
/// The export set, and so the peer-group totals, cover only the kept rows.
pub fn reconcile_with_scope(
    tender: &RawGrid,
    reference: &ReferenceData,
    options: &ReconcileOptions,
    scope: Option<&AccountScope>,
) -> Result<Reconciliation> {
    let span = info_span!("reconcile", grid_rows = tender.len());
    let _guard = span.enter();
    let start = Instant::now();

    let prepared =
        info_span!("prepare").in_scope(|| prepare_table(tender, TableKind::Tender, options))?;

    let extracted =
        info_span!("extract").in_scope(|| tender_rows(&prepared.table, &prepared.mapping));
    let tender_row_count = extracted.rows.len();

    let (scoped, scope_excluded) = match scope {
        Some(scope) => {
            let ScopedRows { rows, excluded } = info_span!("scope")
                .in_scope(|| apply_scope(extracted.rows, scope, &reference.accounts));
            (rows, Some(excluded))
        }
        None => (extracted.rows, None),
    };
    let scoped_row_count = scoped.len();

    let outcome = info_span!("match").in_scope(|| {
        let outcome = match_catalog(scoped, &reference.catalog);
        enrich_accounts(outcome, &reference.accounts)
    });

    let rows = info_span!("weights")
        .in_scope(|| apply_peer_weights(outcome.rows, &reference.peer_groups));
    debug_assert_eq!(rows.len(), scoped_row_count);

    let display_rows = rows.iter().filter(|row| row.is_matched()).count();
    let diagnostics = Diagnostics {
        header: prepared.location,
        unmapped_columns: prepared.mapping.unmapped().map(str::to_string).collect(),
        mapping: prepared.mapping,
        tender_rows: tender_row_count,
        scope_excluded,
        export_rows: rows.len(),
        display_rows,
        match_stats: outcome.stats,
        quantity_fallbacks: extracted.quantity_fallbacks,
    };

    info!(
        header = %diagnostics.header.describe(),
        export_rows = diagnostics.export_rows,
        display_rows = diagnostics.display_rows,
        quantity_fallbacks = diagnostics.quantity_fallbacks,
        "reconciliation complete"
    );
    debug!(duration_ms = start.elapsed().as_millis(), "reconcile timing");

    Ok(Reconciliation {
        columns: prepared.table.columns,
        rows,
        diagnostics,
    })
}

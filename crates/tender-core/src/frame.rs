//! Polars views of reconciled rows and reports.

use polars::prelude::*;

use tender_model::{CellValue, ReconciledRow};

use crate::report::{DeploymentSuggestion, HospitalSummary, IngredientValue, format_amount};

/// Columns appended after the original tender columns, in order.
pub const APPENDED_COLUMNS: [&str; 5] = [
    "ProductName",
    "Region",
    "AccountOwner",
    "PeerGroup",
    "PeerGroupRatio",
];

/// Output column names: the tender columns followed by [`APPENDED_COLUMNS`].
///
/// An appended name that collides with a tender column gets a `_matched`
/// suffix so every output column stays unique.
pub fn output_columns(tender_columns: &[String]) -> Vec<String> {
    let mut columns = tender_columns.to_vec();
    for name in APPENDED_COLUMNS {
        let mut candidate = name.to_string();
        while columns.contains(&candidate) {
            candidate.push_str("_matched");
        }
        columns.push(candidate);
    }
    columns
}

fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

fn number_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds a frame with the original cells as text plus the appended columns.
pub fn reconciled_frame<'a, I>(tender_columns: &[String], rows: I) -> PolarsResult<DataFrame>
where
    I: IntoIterator<Item = &'a ReconciledRow>,
{
    let rows: Vec<&ReconciledRow> = rows.into_iter().collect();
    let names = output_columns(tender_columns);
    let mut columns: Vec<Column> = Vec::with_capacity(names.len());

    for (idx, name) in names.iter().take(tender_columns.len()).enumerate() {
        let values = rows
            .iter()
            .map(|row| row.tender.cells.get(idx).and_then(CellValue::to_text_non_empty))
            .collect();
        columns.push(text_column(name, values));
    }

    let appended = &names[tender_columns.len()..];
    columns.push(text_column(
        &appended[0],
        rows.iter().map(|row| row.product_name.clone()).collect(),
    ));
    columns.push(text_column(
        &appended[1],
        rows.iter().map(|row| row.region.clone()).collect(),
    ));
    columns.push(text_column(
        &appended[2],
        rows.iter().map(|row| row.account_owner.clone()).collect(),
    ));
    columns.push(text_column(
        &appended[3],
        rows.iter().map(|row| row.peer_group.clone()).collect(),
    ));
    columns.push(number_column(
        &appended[4],
        rows.iter().map(|row| row.peer_group_ratio).collect(),
    ));

    DataFrame::new(columns)
}

pub fn ingredient_value_frame(values: &[IngredientValue]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        text_column(
            "ActiveIngredient",
            values
                .iter()
                .map(|v| Some(v.active_ingredient.clone()))
                .collect(),
        ),
        number_column("Value", values.iter().map(|v| Some(v.value)).collect()),
        text_column(
            "ValueFormatted",
            values
                .iter()
                .map(|v| Some(format_amount(v.value)))
                .collect(),
        ),
    ])
}

pub fn hospital_summary_frame(summaries: &[HospitalSummary]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        text_column(
            "Hospital",
            summaries.iter().map(|s| Some(s.hospital.clone())).collect(),
        ),
        text_column(
            "ActiveIngredient",
            summaries
                .iter()
                .map(|s| Some(s.active_ingredient.clone()))
                .collect(),
        ),
        number_column("Quantity", summaries.iter().map(|s| Some(s.quantity)).collect()),
        number_column("Value", summaries.iter().map(|s| Some(s.value)).collect()),
    ])
}

pub fn suggestion_frame(suggestions: &[DeploymentSuggestion]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        text_column(
            "ProductName",
            suggestions
                .iter()
                .map(|s| Some(s.product_name.clone()))
                .collect(),
        ),
        text_column(
            "ActiveIngredient",
            suggestions
                .iter()
                .map(|s| s.active_ingredient.clone())
                .collect(),
        ),
        text_column(
            "Hospital",
            suggestions.iter().map(|s| s.hospital.clone()).collect(),
        ),
        text_column("Region", suggestions.iter().map(|s| s.region.clone()).collect()),
        text_column(
            "AccountOwner",
            suggestions.iter().map(|s| s.account_owner.clone()).collect(),
        ),
        number_column(
            "WonQuantity",
            suggestions.iter().map(|s| Some(s.won_quantity)).collect(),
        ),
        number_column(
            "SuggestedQuantity",
            suggestions
                .iter()
                .map(|s| Some(s.suggested_quantity))
                .collect(),
        ),
        text_column(
            "PeerGroup",
            suggestions.iter().map(|s| s.peer_group.clone()).collect(),
        ),
        text_column(
            "Reason",
            suggestions.iter().map(|s| Some(s.reason.clone())).collect(),
        ),
    ])
}

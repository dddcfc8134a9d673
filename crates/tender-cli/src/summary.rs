use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tender_core::{format_amount, format_ratio};
use tender_model::{HeaderLocation, format_numeric};

use crate::commands::{InspectReport, ReconcileRun};

/// Rows shown in the matched-rows preview.
const PREVIEW_ROWS: usize = 20;

pub fn print_reconcile_summary(run: &ReconcileRun) {
    let diagnostics = run.reconciliation.diagnostics();
    println!("Tender: {}", run.tender.display());
    println!("Header: {}", diagnostics.header.describe());
    match &run.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run)"),
    }

    let stats = &diagnostics.match_stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Tender rows"), Cell::new(diagnostics.tender_rows)]);
    if let Some(excluded) = diagnostics.scope_excluded {
        table.add_row(vec![
            Cell::new("Outside account scope"),
            count_cell(excluded, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Matched"),
        Cell::new(stats.matched).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Unmatched"),
        count_cell(stats.unmatched, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Catalog duplicates dropped"),
        count_cell(stats.duplicates_dropped, Color::Yellow),
    ]);
    table.add_row(vec![Cell::new("Account enriched"), Cell::new(stats.enriched)]);
    table.add_row(vec![
        Cell::new("Quantity fallbacks"),
        count_cell(diagnostics.quantity_fallbacks, Color::Yellow),
    ]);
    if let Some(suggestions) = &run.suggestions {
        table.add_row(vec![
            Cell::new("Deployment suggestions"),
            Cell::new(suggestions.len()),
        ]);
    }
    println!("{table}");

    if !diagnostics.unmapped_columns.is_empty() {
        println!(
            "Unmapped columns: {}",
            diagnostics.unmapped_columns.join(", ")
        );
    }

    print_matched_preview(run);
    print_value_table(run);
}

fn print_matched_preview(run: &ReconcileRun) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Active ingredient"),
        header_cell("Strength"),
        header_cell("Product"),
        header_cell("Quantity"),
        header_cell("Peer group"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut shown = 0usize;
    for row in run.reconciliation.display_rows().take(PREVIEW_ROWS) {
        let tender = &row.tender;
        table.add_row(vec![
            Cell::new(row.origin_index() + 1),
            Cell::new(&tender.active_ingredient),
            Cell::new(&tender.strength),
            Cell::new(row.product_name.as_deref().unwrap_or_default())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(format_numeric(tender.quantity)),
            optional_cell(row.peer_group.as_deref()),
            match row.peer_group_ratio {
                Some(ratio) => Cell::new(format_ratio(ratio)),
                None => dim_cell("-"),
            },
        ]);
        shown += 1;
    }
    if shown == 0 {
        println!("No tender rows matched the catalog.");
        return;
    }
    println!("{table}");
    let total = run.reconciliation.diagnostics().display_rows;
    if total > shown {
        println!("... {} more matched rows in the display output", total - shown);
    }
}

fn print_value_table(run: &ReconcileRun) {
    let values = run.reconciliation.value_by_ingredient();
    if values.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Active ingredient"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total = 0.0;
    for value in &values {
        total += value.value;
        table.add_row(vec![
            Cell::new(&value.active_ingredient),
            Cell::new(format_amount(value.value)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(format_amount(total)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_inspect_report(report: &InspectReport) {
    println!("File: {}", report.file.display());
    println!("Table: {}", report.kind);
    println!(
        "Rows: {} (scanned {} for a header)",
        report.grid_rows, report.scanned
    );
    println!("Header: {}", report.location.describe());
    if let HeaderLocation::Found(candidate) | HeaderLocation::Fallback(candidate) =
        &report.location
    {
        let keywords: Vec<&str> = candidate
            .matched_keywords
            .iter()
            .map(String::as_str)
            .collect();
        println!("Matched keywords: {}", keywords.join(", "));
    }

    let Some(mapping) = &report.mapping else {
        return;
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Field")]);
    apply_table_style(&mut table);
    for column in &report.columns {
        let field = match mapping.field_for(column) {
            Some(field) if mapping.column_for(field) == Some(column.as_str()) => {
                Cell::new(field).fg(Color::Green)
            }
            Some(field) => dim_cell(format!("{field} (shadowed)")),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(column), field]);
    }
    println!("{table}");

    if !report.missing.is_empty() {
        let missing: Vec<String> = report.missing.iter().map(ToString::to_string).collect();
        println!("Missing required columns: {}", missing.join(", "));
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

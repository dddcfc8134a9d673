//! Typed record extraction from promoted tables.

use std::collections::BTreeMap;

use tracing::debug;

use tender_model::{
    AccountEntry, CanonicalField, CatalogEntry, CellValue, ColumnMapping, PeerGroupMap, TableRow,
    TenderRow, TenderTable,
};
use tender_normalization::{
    fold_text, normalize_active, normalize_active_cell, normalize_group_cell,
    normalize_strength_cell, try_number,
};

static EMPTY: CellValue = CellValue::Empty;

/// Column positions of the fields a mapping resolved.
#[derive(Debug, Clone)]
pub struct FieldCells {
    positions: BTreeMap<CanonicalField, usize>,
}

impl FieldCells {
    pub fn new(table: &TenderTable, mapping: &ColumnMapping) -> Self {
        let positions = mapping
            .resolved()
            .into_iter()
            .filter_map(|(field, label)| table.column_index(label).map(|idx| (field, idx)))
            .collect();
        Self { positions }
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.positions.contains_key(&field)
    }

    /// The cell for `field`, empty when the field has no column.
    pub fn cell<'r>(&self, row: &'r TableRow, field: CanonicalField) -> &'r CellValue {
        self.positions
            .get(&field)
            .and_then(|idx| row.cells.get(*idx))
            .unwrap_or(&EMPTY)
    }

    /// Trimmed text of `field`, `None` when blank or unmapped.
    pub fn text(&self, row: &TableRow, field: CanonicalField) -> Option<String> {
        self.cell(row, field).to_text_non_empty()
    }
}

/// Tender rows plus the number of quantity cells that fell back to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenderRows {
    pub rows: Vec<TenderRow>,
    pub quantity_fallbacks: usize,
}

/// Builds one [`TenderRow`] per data row, computing the join keys.
pub fn tender_rows(table: &TenderTable, mapping: &ColumnMapping) -> TenderRows {
    let cells = FieldCells::new(table, mapping);
    let mut quantity_fallbacks = 0;
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let quantity = try_number(cells.cell(row, CanonicalField::Quantity));
            if quantity.is_none() {
                quantity_fallbacks += 1;
            }
            let active = cells.cell(row, CanonicalField::ActiveIngredient);
            let strength = cells.cell(row, CanonicalField::Strength);
            let group = cells.cell(row, CanonicalField::DosageGroup);
            TenderRow {
                origin_index: row.origin_index,
                cells: row.cells.clone(),
                active_ingredient: active.to_text().trim().to_string(),
                strength: strength.to_text().trim().to_string(),
                dosage_group: group.to_text().trim().to_string(),
                route: cells.text(row, CanonicalField::Route),
                hospital: cells.text(row, CanonicalField::Hospital),
                quantity: quantity.unwrap_or(0.0),
                unit_price: try_number(cells.cell(row, CanonicalField::UnitPrice)).unwrap_or(0.0),
                key_active: normalize_active_cell(active),
                key_strength: normalize_strength_cell(strength),
                key_group: normalize_group_cell(group),
            }
        })
        .collect();
    debug!(
        rows = table.height(),
        quantity_fallbacks, "extracted tender rows"
    );
    TenderRows {
        rows,
        quantity_fallbacks,
    }
}

/// Catalog entries in table order. Rows without a product name or
/// ingredient cannot be offered and are skipped.
pub fn catalog_entries(table: &TenderTable, mapping: &ColumnMapping) -> Vec<CatalogEntry> {
    let cells = FieldCells::new(table, mapping);
    let entries: Vec<CatalogEntry> = table
        .rows
        .iter()
        .filter_map(|row| {
            let product_name = cells.text(row, CanonicalField::ProductName)?;
            let active = cells.cell(row, CanonicalField::ActiveIngredient);
            let key_active = normalize_active_cell(active);
            if key_active.is_empty() {
                return None;
            }
            Some(CatalogEntry {
                product_name,
                active_ingredient: active.to_text().trim().to_string(),
                key_active,
                key_strength: normalize_strength_cell(cells.cell(row, CanonicalField::Strength)),
                key_group: normalize_group_cell(cells.cell(row, CanonicalField::DosageGroup)),
            })
        })
        .collect();
    debug!(
        rows = table.height(),
        entries = entries.len(),
        "extracted catalog entries"
    );
    entries
}

/// Ingredient to peer-group labels; the first label seen for an ingredient wins.
pub fn peer_group_map(table: &TenderTable, mapping: &ColumnMapping) -> PeerGroupMap {
    let cells = FieldCells::new(table, mapping);
    let map: PeerGroupMap = table
        .rows
        .iter()
        .filter_map(|row| {
            let label = cells.text(row, CanonicalField::TherapeuticGroup)?;
            let key = normalize_active_cell(cells.cell(row, CanonicalField::ActiveIngredient));
            Some((key, label))
        })
        .collect();
    debug!(groups = map.len(), "extracted peer groups");
    map
}

/// Account reference entries in table order, skipping rows without a product.
pub fn account_entries(table: &TenderTable, mapping: &ColumnMapping) -> Vec<AccountEntry> {
    let cells = FieldCells::new(table, mapping);
    let entries: Vec<AccountEntry> = table
        .rows
        .iter()
        .filter_map(|row| {
            let product_name = cells.text(row, CanonicalField::ProductName)?;
            let active_ingredient = cells.text(row, CanonicalField::ActiveIngredient);
            Some(AccountEntry {
                key_product: fold_text(&product_name),
                product_name,
                region: cells.text(row, CanonicalField::Region),
                area: cells.text(row, CanonicalField::Area),
                province: cells.text(row, CanonicalField::Province),
                account_owner: cells.text(row, CanonicalField::AccountOwner),
                hospital: cells.text(row, CanonicalField::Hospital),
                key_active: active_ingredient
                    .as_deref()
                    .map(normalize_active)
                    .unwrap_or_default(),
                active_ingredient,
            })
        })
        .collect();
    debug!(entries = entries.len(), "extracted account entries");
    entries
}

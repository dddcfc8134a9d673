//! Summary reports over reconciled rows.

use std::collections::BTreeMap;

use serde::Serialize;

use tender_model::{AccountEntry, PeerGroupMap, ReconciledRow};
use tender_normalization::fold_text;

/// Account-owner markers of territories that are not being worked.
const SUSPENDED_MARKERS: [&str; 2] = ["tam ngung trien khai", "ko co dia ban"];

/// Total planned value of one active ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientValue {
    /// First raw ingredient name seen for the key.
    pub active_ingredient: String,
    pub key_active: String,
    pub value: f64,
}

/// Totals `quantity × unit_price` per normalized active ingredient, largest first.
pub fn value_by_ingredient<'a, I>(rows: I) -> Vec<IngredientValue>
where
    I: IntoIterator<Item = &'a ReconciledRow>,
{
    let mut totals: BTreeMap<&str, IngredientValue> = BTreeMap::new();
    for row in rows {
        let tender = &row.tender;
        totals
            .entry(tender.key_active.as_str())
            .or_insert_with(|| IngredientValue {
                active_ingredient: tender.active_ingredient.clone(),
                key_active: tender.key_active.clone(),
                value: 0.0,
            })
            .value += tender.value();
    }
    let mut values: Vec<IngredientValue> = totals.into_values().collect();
    values.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.active_ingredient.cmp(&b.active_ingredient))
    });
    values
}

/// Formats an amount with Vietnamese magnitude words.
///
/// `2_500_000_000.0` → `"2.50 tỷ"`, `1_250_000.0` → `"1.25 triệu"`,
/// `4_500.0` → `"4.50 nghìn"`, smaller amounts print their integer part.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1e9 {
        format!("{:.2} tỷ", amount / 1e9)
    } else if amount >= 1e6 {
        format!("{:.2} triệu", amount / 1e6)
    } else if amount >= 1e3 {
        format!("{:.2} nghìn", amount / 1e3)
    } else {
        (amount.trunc() as i64).to_string()
    }
}

/// Requested quantity and value per hospital and ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalSummary {
    pub hospital: String,
    pub active_ingredient: String,
    pub quantity: f64,
    pub value: f64,
}

/// Sums quantity and value per `(hospital, ingredient)`, sorted by hospital then
/// ingredient. Rows without a hospital are grouped under an empty name.
pub fn hospital_summary<'a, I>(rows: I) -> Vec<HospitalSummary>
where
    I: IntoIterator<Item = &'a ReconciledRow>,
{
    let mut totals: BTreeMap<(String, String), HospitalSummary> = BTreeMap::new();
    for row in rows {
        let tender = &row.tender;
        let hospital = tender.hospital.clone().unwrap_or_default();
        let summary = totals
            .entry((hospital.clone(), tender.key_active.clone()))
            .or_insert_with(|| HospitalSummary {
                hospital,
                active_ingredient: tender.active_ingredient.clone(),
                quantity: 0.0,
                value: 0.0,
            });
        summary.quantity += tender.quantity;
        summary.value += tender.value();
    }
    let mut summaries: Vec<HospitalSummary> = totals.into_values().collect();
    summaries.sort_by(|a, b| {
        a.hospital
            .cmp(&b.hospital)
            .then_with(|| a.active_ingredient.cmp(&b.active_ingredient))
    });
    summaries
}

/// A proposed deployment volume for one account entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentSuggestion {
    pub product_name: String,
    pub active_ingredient: Option<String>,
    pub hospital: Option<String>,
    pub region: Option<String>,
    pub account_owner: Option<String>,
    pub won_quantity: f64,
    pub suggested_quantity: f64,
    pub peer_group: Option<String>,
    pub reason: String,
}

/// True when the account owner marks the territory as suspended or unassigned.
pub fn is_suspended(account_owner: Option<&str>) -> bool {
    account_owner.is_some_and(|owner| {
        let folded = fold_text(owner);
        SUSPENDED_MARKERS
            .iter()
            .any(|marker| folded.contains(marker))
    })
}

/// Reason text for a suggestion in `peer_group`.
pub fn suggestion_reason(peer_group: Option<&str>) -> String {
    format!(
        "Nhóm {} thường sử dụng; sản phẩm mới, hiệu quả tốt hơn.",
        peer_group.unwrap_or("chưa xác định")
    )
}

/// One suggestion per active account entry.
///
/// The won quantity sums the quantities of reconciled rows whose product
/// name folds to the entry's product; the suggested quantity is that amount
/// times `multiplier`, rounded up.
pub fn deployment_suggestions(
    accounts: &[AccountEntry],
    rows: &[ReconciledRow],
    peer_groups: &PeerGroupMap,
    multiplier: f64,
) -> Vec<DeploymentSuggestion> {
    let mut won: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        if let Some(product) = &row.product_name {
            *won.entry(fold_text(product)).or_insert(0.0) += row.quantity();
        }
    }

    accounts
        .iter()
        .filter(|entry| !is_suspended(entry.account_owner.as_deref()))
        .map(|entry| {
            let won_quantity = won.get(&entry.key_product).copied().unwrap_or(0.0);
            let peer_group = peer_groups.group_for(&entry.key_active).map(str::to_string);
            DeploymentSuggestion {
                product_name: entry.product_name.clone(),
                active_ingredient: entry.active_ingredient.clone(),
                hospital: entry.hospital.clone(),
                region: entry.region.clone(),
                account_owner: entry.account_owner.clone(),
                won_quantity,
                suggested_quantity: (won_quantity * multiplier).ceil(),
                reason: suggestion_reason(peer_group.as_deref()),
                peer_group,
            }
        })
        .collect()
}

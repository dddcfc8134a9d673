//! Restricting a tender to the hospitals the company deploys to.
//!
//! The account reference lists, per product, the hospital and its
//! region/area/province. A scope selects a subset of those entries; the
//! tender rows kept are those whose hospital appears among the selected
//! entries. All comparisons use folded text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tender_model::{AccountEntry, TenderRow};
use tender_normalization::fold_text;

/// Account-reference selection. Unset criteria match every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountScope {
    pub region: Option<String>,
    pub area: Option<String>,
    pub province: Option<String>,
    pub hospital: Option<String>,
}

impl AccountScope {
    /// A scope admitting every account entry that names a hospital.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    #[must_use]
    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    #[must_use]
    pub fn with_hospital(mut self, hospital: impl Into<String>) -> Self {
        self.hospital = Some(hospital.into());
        self
    }

    /// Whether `entry` satisfies every set criterion.
    pub fn admits(&self, entry: &AccountEntry) -> bool {
        criterion_holds(self.region.as_deref(), entry.region.as_deref())
            && criterion_holds(self.area.as_deref(), entry.area.as_deref())
            && criterion_holds(self.province.as_deref(), entry.province.as_deref())
            && criterion_holds(self.hospital.as_deref(), entry.hospital.as_deref())
    }

    /// Folded hospital names of the admitted entries.
    pub fn hospitals(&self, accounts: &[AccountEntry]) -> BTreeSet<String> {
        accounts
            .iter()
            .filter(|entry| self.admits(entry))
            .filter_map(|entry| entry.hospital.as_deref())
            .map(fold_text)
            .filter(|hospital| !hospital.is_empty())
            .collect()
    }
}

fn criterion_holds(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual.is_some_and(|actual| fold_text(actual) == fold_text(wanted)),
    }
}

/// Tender rows kept by a scope and the number dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopedRows {
    pub rows: Vec<TenderRow>,
    pub excluded: usize,
}

/// Keeps the rows whose hospital is among the hospitals `scope` admits.
///
/// Rows without a hospital are dropped. An empty account reference admits
/// nothing.
pub fn apply_scope(
    rows: Vec<TenderRow>,
    scope: &AccountScope,
    accounts: &[AccountEntry],
) -> ScopedRows {
    let hospitals = scope.hospitals(accounts);
    debug!(hospitals = hospitals.len(), "account scope hospitals");

    let total = rows.len();
    let rows: Vec<TenderRow> = rows
        .into_iter()
        .filter(|row| {
            row.hospital
                .as_deref()
                .is_some_and(|hospital| hospitals.contains(&fold_text(hospital)))
        })
        .collect();
    let excluded = total - rows.len();
    info!(kept = rows.len(), excluded, "applied account scope");
    ScopedRows { rows, excluded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(region: &str, province: &str, hospital: &str) -> AccountEntry {
        AccountEntry {
            product_name: "Para-X".to_string(),
            key_product: "para-x".to_string(),
            region: Some(region.to_string()),
            area: None,
            province: Some(province.to_string()),
            account_owner: None,
            hospital: Some(hospital.to_string()),
            active_ingredient: None,
            key_active: String::new(),
        }
    }

    fn accounts() -> Vec<AccountEntry> {
        vec![
            account("Bắc", "Hà Nội", "BV Bạch Mai"),
            account("Bắc", "Hải Phòng", "BV Việt Tiệp"),
            account("Nam", "TP HCM", "BV Chợ Rẫy"),
        ]
    }

    #[test]
    fn unrestricted_scope_admits_every_hospital() {
        let hospitals = AccountScope::all().hospitals(&accounts());
        assert_eq!(hospitals.len(), 3);
        assert!(hospitals.contains("bv bach mai"));
    }

    #[test]
    fn criteria_compare_folded_text() {
        let scope = AccountScope::all().with_region("BAC").with_province("ha noi");
        let hospitals = scope.hospitals(&accounts());
        assert_eq!(hospitals.into_iter().collect::<Vec<_>>(), vec!["bv bach mai"]);
    }

    #[test]
    fn unset_entry_field_fails_a_set_criterion() {
        let scope = AccountScope::all().with_area("Đồng bằng");
        assert!(scope.hospitals(&accounts()).is_empty());
    }
}

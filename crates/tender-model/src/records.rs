//! Rows flowing through the reconciliation pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// One requested item of the tender after header promotion and column mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderRow {
    /// Row index of this line in the original grid.
    pub origin_index: usize,
    /// Original cells, aligned with the promoted table's columns.
    pub cells: Vec<CellValue>,
    pub active_ingredient: String,
    pub strength: String,
    pub dosage_group: String,
    pub route: Option<String>,
    pub hospital: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub key_active: String,
    pub key_strength: String,
    pub key_group: String,
}

impl TenderRow {
    /// Composite join key `(key_active, key_strength, key_group)`.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.key_active, &self.key_strength, &self.key_group)
    }

    /// Planned value of the line (quantity × unit price).
    pub fn value(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// One sellable product of the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product_name: String,
    pub active_ingredient: String,
    pub key_active: String,
    pub key_strength: String,
    pub key_group: String,
}

impl CatalogEntry {
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.key_active, &self.key_strength, &self.key_group)
    }
}

/// Normalized active-ingredient key to peer-group label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerGroupMap {
    groups: BTreeMap<String, String>,
}

impl PeerGroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `label` for `key_active` unless the ingredient already has one.
    /// Returns false when the entry was ignored.
    pub fn insert_first(&mut self, key_active: impl Into<String>, label: impl Into<String>) -> bool {
        let key = key_active.into();
        if key.is_empty() || self.groups.contains_key(&key) {
            return false;
        }
        self.groups.insert(key, label.into());
        true
    }

    pub fn group_for(&self, key_active: &str) -> Option<&str> {
        self.groups.get(key_active).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PeerGroupMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, label) in iter {
            map.insert_first(key, label);
        }
        map
    }
}

/// One row of the account/region reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub product_name: String,
    /// Folded product name used as the join key.
    pub key_product: String,
    pub region: Option<String>,
    pub area: Option<String>,
    pub province: Option<String>,
    pub account_owner: Option<String>,
    pub hospital: Option<String>,
    pub active_ingredient: Option<String>,
    pub key_active: String,
}

/// A tender row joined with at most one catalog entry and its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    pub tender: TenderRow,
    pub product_name: Option<String>,
    pub region: Option<String>,
    pub account_owner: Option<String>,
    pub peer_group: Option<String>,
    pub peer_group_ratio: Option<f64>,
}

impl ReconciledRow {
    /// A row with no enrichment yet.
    pub fn new(tender: TenderRow, product_name: Option<String>) -> Self {
        Self {
            tender,
            product_name,
            region: None,
            account_owner: None,
            peer_group: None,
            peer_group_ratio: None,
        }
    }

    #[must_use]
    pub fn with_account(mut self, region: Option<String>, account_owner: Option<String>) -> Self {
        self.region = region;
        self.account_owner = account_owner;
        self
    }

    #[must_use]
    pub fn with_peer_weight(mut self, peer_group: Option<String>, ratio: Option<f64>) -> Self {
        self.peer_group = peer_group;
        self.peer_group_ratio = ratio;
        self
    }

    pub fn origin_index(&self) -> usize {
        self.tender.origin_index
    }

    pub fn is_matched(&self) -> bool {
        self.product_name.is_some()
    }

    pub fn quantity(&self) -> f64 {
        self.tender.quantity
    }

    pub fn value(&self) -> f64 {
        self.tender.value()
    }
}

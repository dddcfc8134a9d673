//! Peer-group weighting.
//!
//! Each row's quantity is compared with the total requested quantity of its
//! peer group (all rows whose ingredient maps to the same group label). A
//! ratio exists only when the ingredient has a group and that group's total
//! is positive.

use std::collections::BTreeMap;

use tender_model::{PeerGroupMap, ReconciledRow, TenderRow};

/// A row that carries a quantity and an active-ingredient key.
pub trait Weighted {
    fn key_active(&self) -> &str;
    fn quantity(&self) -> f64;
}

impl Weighted for TenderRow {
    fn key_active(&self) -> &str {
        &self.key_active
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }
}

impl Weighted for ReconciledRow {
    fn key_active(&self) -> &str {
        &self.tender.key_active
    }

    fn quantity(&self) -> f64 {
        self.tender.quantity
    }
}

/// Per-group quantity totals over a set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerWeights<'g> {
    groups: &'g PeerGroupMap,
    totals: BTreeMap<&'g str, f64>,
}

impl<'g> PeerWeights<'g> {
    pub fn compute<W: Weighted>(rows: &[W], groups: &'g PeerGroupMap) -> Self {
        let mut totals: BTreeMap<&'g str, f64> = BTreeMap::new();
        for row in rows {
            if let Some(group) = groups.group_for(row.key_active()) {
                *totals.entry(group).or_insert(0.0) += row.quantity();
            }
        }
        Self { groups, totals }
    }

    pub fn group_for<W: Weighted>(&self, row: &W) -> Option<&'g str> {
        self.groups.group_for(row.key_active())
    }

    pub fn total(&self, group: &str) -> Option<f64> {
        self.totals.get(group).copied()
    }

    /// `quantity / group_total`, or `None` when ungrouped or the total is not positive.
    pub fn ratio<W: Weighted>(&self, row: &W) -> Option<f64> {
        let total = self.total(self.group_for(row)?)?;
        (total > 0.0).then(|| row.quantity() / total)
    }
}

/// Ratios for `rows` in order.
pub fn peer_group_ratios<W: Weighted>(rows: &[W], groups: &PeerGroupMap) -> Vec<Option<f64>> {
    let weights = PeerWeights::compute(rows, groups);
    rows.iter().map(|row| weights.ratio(row)).collect()
}

/// Attaches peer group and ratio to every row, weighting over the whole set.
pub fn apply_peer_weights(rows: Vec<ReconciledRow>, groups: &PeerGroupMap) -> Vec<ReconciledRow> {
    let weights = PeerWeights::compute(&rows, groups);
    let annotations: Vec<(Option<String>, Option<f64>)> = rows
        .iter()
        .map(|row| {
            (
                weights.group_for(row).map(str::to_string),
                weights.ratio(row),
            )
        })
        .collect();
    rows.into_iter()
        .zip(annotations)
        .map(|(row, (group, ratio))| row.with_peer_weight(group, ratio))
        .collect()
}

/// Renders a ratio as a percentage with two decimals (`0.25` → `"25.00%"`).
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

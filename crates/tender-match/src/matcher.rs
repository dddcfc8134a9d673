//! Catalog join on the composite normalized key.
//!
//! The join is a left outer join: every tender row yields at least one
//! candidate, one per catalog entry sharing its key or a single unmatched
//! candidate. Candidates are then reduced to one per `origin_index`, keeping
//! the first in catalog order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tender_model::{CatalogEntry, ReconciledRow, TenderRow};

/// Counters describing one matcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub matched: usize,
    pub unmatched: usize,
    /// Extra catalog candidates removed by the one-row-per-origin reduction.
    pub duplicates_dropped: usize,
    /// Matched rows that also found an account entry.
    pub enriched: usize,
}

/// One join output before reduction: a tender row position and the catalog
/// entry position it matched, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinCandidate {
    pub row: usize,
    pub origin_index: usize,
    pub entry: Option<usize>,
}

type JoinKey<'a> = (&'a str, &'a str, &'a str);

/// Catalog entries grouped by key, each list in catalog order.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex<'a> {
    by_key: HashMap<JoinKey<'a>, Vec<usize>>,
}

impl<'a> CatalogIndex<'a> {
    pub fn new(catalog: &'a [CatalogEntry]) -> Self {
        let mut by_key: HashMap<JoinKey<'a>, Vec<usize>> = HashMap::new();
        for (idx, entry) in catalog.iter().enumerate() {
            if entry.key_active.is_empty() {
                continue;
            }
            by_key.entry(entry.key()).or_default().push(idx);
        }
        Self { by_key }
    }

    pub fn lookup<'s>(&'s self, row: &'s TenderRow) -> &'s [usize] {
        if row.key_active.is_empty() {
            return &[];
        }
        self.by_key
            .get(&row.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Left outer join of `rows` against `catalog`, one candidate per match.
pub fn join_candidates(rows: &[TenderRow], catalog: &[CatalogEntry]) -> Vec<JoinCandidate> {
    let index = CatalogIndex::new(catalog);
    let mut candidates = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let matches = index.lookup(row);
        if matches.is_empty() {
            candidates.push(JoinCandidate {
                row: row_idx,
                origin_index: row.origin_index,
                entry: None,
            });
        } else {
            candidates.extend(matches.iter().map(|entry| JoinCandidate {
                row: row_idx,
                origin_index: row.origin_index,
                entry: Some(*entry),
            }));
        }
    }
    candidates
}

/// Keeps the first candidate for each `origin_index`, preserving order.
pub fn dedup_first_by_origin(candidates: Vec<JoinCandidate>) -> Vec<JoinCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.origin_index))
        .collect()
}

fn has_distinct_origins(rows: &[TenderRow]) -> bool {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter().all(|row| seen.insert(row.origin_index))
}

/// Matcher output: exactly one reconciled row per tender row.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub rows: Vec<ReconciledRow>,
    pub stats: MatchStats,
}

/// Joins tender rows with the catalog and reduces to one row per origin.
///
/// `rows` must carry distinct `origin_index` values, as rows extracted from
/// one promoted table do.
pub fn match_catalog(rows: Vec<TenderRow>, catalog: &[CatalogEntry]) -> MatchOutcome {
    debug_assert!(
        has_distinct_origins(&rows),
        "tender rows must have distinct origin indices"
    );
    let candidates = join_candidates(&rows, catalog);
    let total_candidates = candidates.len();
    let kept = dedup_first_by_origin(candidates);

    let mut stats = MatchStats {
        duplicates_dropped: total_candidates - kept.len(),
        ..MatchStats::default()
    };
    let mut entries: Vec<Option<usize>> = vec![None; rows.len()];
    for candidate in &kept {
        entries[candidate.row] = candidate.entry;
    }

    let reconciled: Vec<ReconciledRow> = rows
        .into_iter()
        .zip(entries)
        .map(|(row, entry)| {
            let product_name = entry.map(|idx| catalog[idx].product_name.clone());
            if product_name.is_some() {
                stats.matched += 1;
            } else {
                stats.unmatched += 1;
            }
            ReconciledRow::new(row, product_name)
        })
        .collect();

    if stats.duplicates_dropped > 0 {
        debug!(
            dropped = stats.duplicates_dropped,
            "kept first catalog match per tender row"
        );
    }
    info!(
        matched = stats.matched,
        unmatched = stats.unmatched,
        "catalog join complete"
    );
    MatchOutcome {
        rows: reconciled,
        stats,
    }
}

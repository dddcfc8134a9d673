//! Header row detection for headerless worksheets.
//!
//! Tender documents usually open with a title block (issuing hospital,
//! tender name, dates) before the real column header. Each row in the scan
//! window is folded to lowercase accent-free text and scored by how many
//! keyword groups it mentions. The search runs in two phases:
//!
//! 1. the first row containing every anchor group wins immediately
//!    ([`HeaderLocation::Found`]);
//! 2. otherwise, under [`HeaderStrategy::BestEffort`], the highest-scoring
//!    row with a non-zero score ([`HeaderLocation::Fallback`]), first row on
//!    ties.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use tender_model::{
    CellValue, HeaderCandidate, HeaderLocation, HeaderStrategy, RawGrid, ReconcileOptions,
    TableKind,
};
use tender_normalization::fold_text;

/// A named keyword with its folded surface forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordGroup {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

pub const ACTIVE_INGREDIENT: &str = "active ingredient";
pub const QUANTITY: &str = "quantity";
pub const CONCENTRATION: &str = "concentration";
pub const DRUG_GROUP: &str = "drug group";
pub const ROUTE: &str = "route";
pub const UNIT_PRICE: &str = "unit price";
pub const PRODUCT_NAME: &str = "product name";
pub const HOSPITAL: &str = "hospital";
pub const CATALOG: &str = "catalog";
pub const REGION: &str = "region";
pub const ACCOUNT_OWNER: &str = "account owner";

/// Keyword vocabulary shared by tender and reference tables.
pub const DEFAULT_VOCABULARY: &[KeywordGroup] = &[
    KeywordGroup {
        name: ACTIVE_INGREDIENT,
        patterns: &["hoat chat", "active ingredient"],
    },
    KeywordGroup {
        name: QUANTITY,
        patterns: &["so luong", "quantity"],
    },
    KeywordGroup {
        name: CONCENTRATION,
        patterns: &["nong do", "ham luong", "concentration", "strength"],
    },
    KeywordGroup {
        name: DRUG_GROUP,
        patterns: &["nhom", "drug group", "group"],
    },
    KeywordGroup {
        name: ROUTE,
        patterns: &["duong dung", "route"],
    },
    KeywordGroup {
        name: UNIT_PRICE,
        patterns: &["don gia", "gia ke hoach", "unit price"],
    },
    KeywordGroup {
        name: PRODUCT_NAME,
        patterns: &["ten san pham", "ten thuoc", "product name"],
    },
    KeywordGroup {
        name: HOSPITAL,
        patterns: &["benh vien", "hospital"],
    },
    KeywordGroup {
        name: CATALOG,
        patterns: &["danh muc"],
    },
    KeywordGroup {
        name: REGION,
        patterns: &["mien", "region"],
    },
    KeywordGroup {
        name: ACCOUNT_OWNER,
        patterns: &["dia ban", "account owner"],
    },
];

/// Anchor groups a row must contain to be accepted in the first phase.
pub fn default_anchors(table: TableKind) -> &'static [&'static str] {
    match table {
        TableKind::Tender => &[ACTIVE_INGREDIENT, QUANTITY],
        TableKind::Catalog | TableKind::PeerGroups => &[ACTIVE_INGREDIENT],
        TableKind::Accounts => &[PRODUCT_NAME],
    }
}

/// Scores and selects the header row of a [`RawGrid`].
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    vocabulary: &'static [KeywordGroup],
    anchors: Vec<&'static str>,
    window: usize,
    strategy: HeaderStrategy,
}

impl HeaderLocator {
    /// A tender-table locator scanning `window` rows with the best-effort fallback.
    pub fn new(window: usize) -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY,
            anchors: default_anchors(TableKind::Tender).to_vec(),
            window,
            strategy: HeaderStrategy::BestEffort,
        }
    }

    /// Locator configured for `table` from run options.
    pub fn for_table(table: TableKind, options: &ReconcileOptions) -> Self {
        Self::new(options.header_scan_window)
            .with_anchors(default_anchors(table))
            .with_strategy(options.header_strategy)
    }

    #[must_use]
    pub fn with_anchors(mut self, anchors: &[&'static str]) -> Self {
        self.anchors = anchors.to_vec();
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: HeaderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: &'static [KeywordGroup]) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of rows actually scanned for `grid` (window clamped to its length).
    pub fn scan_len(&self, grid: &RawGrid) -> usize {
        self.window.min(grid.len())
    }

    /// Scores one row: the distinct keyword groups found in its folded text.
    pub fn score_row(&self, row_index: usize, row: &[CellValue]) -> HeaderCandidate {
        let text = row
            .iter()
            .map(|cell| fold_text(&cell.to_text()))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let matched: BTreeSet<String> = self
            .vocabulary
            .iter()
            .filter(|group| group.patterns.iter().any(|pattern| text.contains(pattern)))
            .map(|group| group.name.to_string())
            .collect();
        HeaderCandidate::new(row_index, matched)
    }

    fn scored_rows<'g>(&'g self, grid: &'g RawGrid) -> impl Iterator<Item = HeaderCandidate> + 'g {
        grid.rows()
            .iter()
            .take(self.scan_len(grid))
            .enumerate()
            .map(|(idx, row)| self.score_row(idx, row))
    }

    fn has_anchors(&self, candidate: &HeaderCandidate) -> bool {
        !self.anchors.is_empty()
            && self
                .anchors
                .iter()
                .all(|anchor| candidate.matched_keywords.contains(*anchor))
    }

    /// Phase one: the first row containing every anchor group.
    pub fn find_anchored(&self, grid: &RawGrid) -> Option<HeaderCandidate> {
        self.scored_rows(grid)
            .find(|candidate| self.has_anchors(candidate))
    }

    /// Phase two: the highest-scoring row with a non-zero score, first row on ties.
    pub fn find_best(&self, grid: &RawGrid) -> Option<HeaderCandidate> {
        self.scored_rows(grid)
            .filter(|candidate| candidate.match_score > 0)
            .fold(None, |best: Option<HeaderCandidate>, candidate| match best {
                Some(current) if current.match_score >= candidate.match_score => Some(current),
                _ => Some(candidate),
            })
    }

    /// Runs both phases according to the configured strategy.
    pub fn locate(&self, grid: &RawGrid) -> HeaderLocation {
        if let Some(candidate) = self.find_anchored(grid) {
            debug!(
                row = candidate.row_index,
                score = candidate.match_score,
                "header row found by anchor keywords"
            );
            return HeaderLocation::Found(candidate);
        }
        if self.strategy == HeaderStrategy::EarlyExit {
            return HeaderLocation::NotFound;
        }
        match self.find_best(grid) {
            Some(candidate) => {
                warn!(
                    row = candidate.row_index,
                    score = candidate.match_score,
                    keywords = ?candidate.matched_keywords,
                    "no anchored header row; using best-scoring row"
                );
                HeaderLocation::Fallback(candidate)
            }
            None => HeaderLocation::NotFound,
        }
    }
}

/// Locates the tender header with the default vocabulary and anchors.
pub fn locate_header(grid: &RawGrid, window: usize) -> HeaderLocation {
    HeaderLocator::new(window).locate(grid)
}

//! Header detection results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A scanned row scored against the header keyword vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCandidate {
    pub row_index: usize,
    pub match_score: usize,
    pub matched_keywords: BTreeSet<String>,
}

impl HeaderCandidate {
    pub fn new(row_index: usize, matched_keywords: BTreeSet<String>) -> Self {
        Self {
            row_index,
            match_score: matched_keywords.len(),
            matched_keywords,
        }
    }
}

/// Outcome of the two-phase header search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderLocation {
    /// A row containing every anchor keyword.
    Found(HeaderCandidate),
    /// No anchored row; the best-scoring row with a non-zero score.
    Fallback(HeaderCandidate),
    NotFound,
}

impl HeaderLocation {
    pub fn candidate(&self) -> Option<&HeaderCandidate> {
        match self {
            Self::Found(candidate) | Self::Fallback(candidate) => Some(candidate),
            Self::NotFound => None,
        }
    }

    pub fn row_index(&self) -> Option<usize> {
        self.candidate().map(|candidate| candidate.row_index)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Found(candidate) => format!("row {} (anchored)", candidate.row_index),
            Self::Fallback(candidate) => format!(
                "row {} (best effort, score {})",
                candidate.row_index, candidate.match_score
            ),
            Self::NotFound => "not found".to_string(),
        }
    }
}

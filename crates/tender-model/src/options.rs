//! Configuration options for a reconciliation run.

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Default number of leading rows scanned for a header.
pub const DEFAULT_HEADER_SCAN_WINDOW: usize = 20;

/// Default factor applied to won quantities when suggesting deployment volumes.
pub const DEFAULT_SUGGESTION_MULTIPLIER: f64 = 1.5;

/// How far the header search goes when no row carries every anchor keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStrategy {
    /// Accept only a row containing every anchor keyword.
    EarlyExit,
    /// Fall back to the best-scoring row with a non-zero score.
    #[default]
    BestEffort,
}

/// Options controlling reconciliation behavior.
///
/// Loaded from TOML; every key is optional:
///
/// ```toml
/// header_scan_window = 15
/// header_strategy = "early-exit"
/// suggestion_multiplier = 1.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileOptions {
    pub header_scan_window: usize,
    pub header_strategy: HeaderStrategy,
    pub suggestion_multiplier: f64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            header_scan_window: DEFAULT_HEADER_SCAN_WINDOW,
            header_strategy: HeaderStrategy::default(),
            suggestion_multiplier: DEFAULT_SUGGESTION_MULTIPLIER,
        }
    }
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.header_scan_window == 0 {
            return Err(OptionsError::Invalid {
                field: "header_scan_window",
                message: "must be at least 1".to_string(),
            });
        }
        if !self.suggestion_multiplier.is_finite() || self.suggestion_multiplier < 0.0 {
            return Err(OptionsError::Invalid {
                field: "suggestion_multiplier",
                message: format!(
                    "must be a non-negative number, got {}",
                    self.suggestion_multiplier
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn with_header_scan_window(mut self, window: usize) -> Self {
        self.header_scan_window = window;
        self
    }

    #[must_use]
    pub fn with_header_strategy(mut self, strategy: HeaderStrategy) -> Self {
        self.header_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_suggestion_multiplier(mut self, multiplier: f64) -> Self {
        self.suggestion_multiplier = multiplier;
        self
    }
}

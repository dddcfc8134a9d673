//! Text normalization for tender reconciliation.
//!
//! - [`keys`]: canonical join keys for active ingredient, strength and dosage group
//! - [`text`]: accent-insensitive folding used for header and label matching
//! - [`numeric`]: numeric coercion with a zero fallback

pub mod keys;
pub mod numeric;
pub mod text;

pub use keys::{
    normalize_active, normalize_active_cell, normalize_group, normalize_group_cell,
    normalize_strength, normalize_strength_cell,
};
pub use numeric::{coerce_number, parse_number, try_number};
pub use text::{collapse_whitespace, fold_compact, fold_text, strip_whitespace};

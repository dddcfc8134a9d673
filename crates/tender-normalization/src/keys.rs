//! Canonical comparison keys for the three matched field classes.
//!
//! Tender rows and catalog entries go through the same functions, so a join
//! on the resulting strings depends only on these heuristics agreeing with
//! themselves. All three functions are total and idempotent.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use tender_model::CellValue;

use crate::text::{collapse_whitespace, strip_whitespace};

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("valid parenthetical regex"));

/// Tokens marking the first part of a dose/volume pair.
const MASS_OR_PERCENT_UNITS: [&str; 4] = ["mcg", "mg", "g", "%"];

/// Active-ingredient key: parentheticals removed, whitespace collapsed, lowercased.
///
/// `"Paracetamol (500mg)"` becomes `"paracetamol"`. Nested annotations are
/// removed innermost first. Diacritics are preserved and composed (NFC), so
/// decomposed and precomposed spellings of the same name share a key.
pub fn normalize_active(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = PARENTHETICAL.replace_all(&current, " ").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    collapse_whitespace(&current).to_lowercase().nfc().collect()
}

/// Strength/concentration key.
///
/// Lowercases, turns decimal commas into dots, splits on `;` and `,`, and
/// keeps only parts containing a digit. A dose/volume pair such as
/// `"500 mg, 10 ml"` (first part carries a mass or percent unit and no `/`,
/// last part carries `ml`) becomes `"500mg/10ml"`. The unit check is a plain
/// substring test, so `"10 microgam, 5 ml"` pairs as well. Anything else is the
/// concatenation of the kept parts with whitespace removed. Malformed input
/// degrades to that concatenation.
pub fn normalize_strength(raw: &str) -> String {
    let lowered = replace_decimal_commas(&raw.to_lowercase());
    let parts: Vec<&str> = lowered
        .split([';', ','])
        .filter(|part| part.chars().any(|c| c.is_ascii_digit()))
        .collect();

    if let [first, .., last] = parts.as_slice()
        && MASS_OR_PERCENT_UNITS.iter().any(|unit| first.contains(unit))
        && !first.contains('/')
        && last.contains("ml")
    {
        return format!("{}/{}", strip_whitespace(first), strip_whitespace(last));
    }

    parts.iter().map(|part| strip_whitespace(part)).collect()
}

/// Dosage-group key: the ASCII digits of the input (`"Nhóm 2"` becomes `"2"`).
pub fn normalize_group(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_active_cell(cell: &CellValue) -> String {
    normalize_active(&cell.to_text())
}

pub fn normalize_strength_cell(cell: &CellValue) -> String {
    normalize_strength(&cell.to_text())
}

pub fn normalize_group_cell(cell: &CellValue) -> String {
    normalize_group(&cell.to_text())
}

/// Replaces commas sitting between two digits with dots (`"0,5g"` → `"0.5g"`).
fn replace_decimal_commas(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(idx, &c)| {
            let between_digits = c == ',' && idx > 0 && chars[idx - 1].is_ascii_digit()
                && chars.get(idx + 1).is_some_and(char::is_ascii_digit);
            if between_digits { '.' } else { c }
        })
        .collect()
}

//! Numeric coercion with a zero fallback.
//!
//! Tender documents routinely carry blank or free-text quantity and price
//! cells. Those coerce to `0.0` instead of failing the run.

use tender_model::CellValue;

/// Parses a human-entered number, returning `None` for anything unparseable.
///
/// Accepts grouping separators (`"1.000.000"`, `"1,000,000"`, `"1 000"`) and
/// decimal commas (`"12,5"`). With both `.` and `,` present the later one is
/// the decimal separator. A single separator followed by exactly three digits
/// after a non-zero integer part of at most three digits is read as grouping.
pub fn parse_number(value: &str) -> Option<f64> {
    let compact: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    if compact.is_empty()
        || !compact
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
        || !compact.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    let canonical = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                compact.replace(',', "")
            } else {
                compact.replace('.', "").replace(',', ".")
            }
        }
        (Some(_), None) => resolve_single_separator(&compact, '.'),
        (None, Some(_)) => resolve_single_separator(&compact, ','),
        (None, None) => compact,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn resolve_single_separator(value: &str, separator: char) -> String {
    let occurrences = value.matches(separator).count();
    if occurrences > 1 {
        return value.replace(separator, "");
    }
    let (integer, fraction) = value.split_once(separator).unwrap_or((value, ""));
    let digits = integer.trim_start_matches(['-', '+']);
    let is_grouping = fraction.len() == 3
        && (1..=3).contains(&digits.len())
        && !digits.starts_with('0');
    if is_grouping {
        format!("{integer}{fraction}")
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Reads a cell as a number when it holds one.
pub fn try_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) if v.is_finite() => Some(*v),
        CellValue::Text(text) => parse_number(text),
        CellValue::Number(_) | CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Reads a cell as a number, falling back to `0.0`.
pub fn coerce_number(cell: &CellValue) -> f64 {
    try_number(cell).unwrap_or(0.0)
}

//! Case- and accent-insensitive text folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Collapses runs of whitespace to single spaces and trims the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes every whitespace character.
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Lowercases, drops diacritics and collapses whitespace.
///
/// `đ` has no decomposition and is mapped to `d` explicitly, so
/// `"Số lượng"` and `"ĐƠN GIÁ"` fold to `"so luong"` and `"don gia"`.
pub fn fold_text(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect();
    collapse_whitespace(&stripped)
}

/// [`fold_text`] with all whitespace removed, used for column label rules.
pub fn fold_compact(raw: &str) -> String {
    strip_whitespace(&fold_text(raw))
}

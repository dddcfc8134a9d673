//! The ordered rule table used to classify column labels.
//!
//! Patterns are matched as substrings of the folded label with whitespace
//! removed (`"Nhóm điều trị"` becomes `"nhomdieutri"`). The first matching
//! rule wins, so specific patterns sit above the generic ones they contain.

use tender_model::CanonicalField;
use tender_model::CanonicalField::{
    AccountOwner, ActiveIngredient, Area, DosageGroup, Hospital, ProductName, Province, Quantity,
    Region, Route, Strength, TherapeuticGroup, Unit, UnitPrice,
};

/// One `(pattern, field)` entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub pattern: &'static str,
    pub field: CanonicalField,
}

const fn rule(pattern: &'static str, field: CanonicalField) -> ColumnRule {
    ColumnRule { pattern, field }
}

pub const COLUMN_RULES: &[ColumnRule] = &[
    // must precede the generic group patterns
    rule("nhomdieutri", TherapeuticGroup),
    rule("therapeutic", TherapeuticGroup),
    rule("tenhoatchat", ActiveIngredient),
    rule("activeingredient", ActiveIngredient),
    rule("hoatchat", ActiveIngredient),
    rule("ingredient", ActiveIngredient),
    rule("nongdo", Strength),
    rule("hamluong", Strength),
    rule("concentration", Strength),
    rule("strength", Strength),
    rule("nhom", DosageGroup),
    rule("druggroup", DosageGroup),
    rule("group", DosageGroup),
    rule("soluong", Quantity),
    rule("quantity", Quantity),
    rule("qty", Quantity),
    rule("giakehoach", UnitPrice),
    rule("dongia", UnitPrice),
    rule("unitprice", UnitPrice),
    rule("price", UnitPrice),
    // "Đơn vị tính" would otherwise read as a province
    rule("donvitinh", Unit),
    rule("unit", Unit),
    rule("duongdung", Route),
    rule("route", Route),
    rule("tensanpham", ProductName),
    rule("productname", ProductName),
    rule("tenthuoc", ProductName),
    rule("benhvien", Hospital),
    rule("syt", Hospital),
    rule("hospital", Hospital),
    rule("mien", Region),
    rule("region", Region),
    rule("vung", Area),
    rule("area", Area),
    rule("tinhthanh", Province),
    rule("tinh", Province),
    rule("province", Province),
    rule("diaban", AccountOwner),
    rule("accountowner", AccountOwner),
    rule("phutrach", AccountOwner),
    rule("owner", AccountOwner),
];

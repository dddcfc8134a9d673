//! The fixed internal schema that observed column labels are mapped onto.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical field a column can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    ActiveIngredient,
    Strength,
    DosageGroup,
    Quantity,
    /// Unit of issue (`Đơn vị tính`).
    Unit,
    Route,
    UnitPrice,
    ProductName,
    /// Hospital or health department issuing the tender (`Bệnh viện/SYT`).
    Hospital,
    Region,
    /// Sub-region below [`CanonicalField::Region`] (`Vùng`).
    Area,
    /// Province (`Tỉnh`).
    Province,
    /// Territory or representative responsible for the account (`Địa bàn`).
    AccountOwner,
    /// Peer-group label in the therapeutic-group reference (`Nhóm điều trị`).
    TherapeuticGroup,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 14] = [
        Self::ActiveIngredient,
        Self::Strength,
        Self::DosageGroup,
        Self::Quantity,
        Self::Unit,
        Self::Route,
        Self::UnitPrice,
        Self::ProductName,
        Self::Hospital,
        Self::Region,
        Self::Area,
        Self::Province,
        Self::AccountOwner,
        Self::TherapeuticGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActiveIngredient => "ActiveIngredient",
            Self::Strength => "Strength",
            Self::DosageGroup => "DosageGroup",
            Self::Quantity => "Quantity",
            Self::Unit => "Unit",
            Self::Route => "Route",
            Self::UnitPrice => "UnitPrice",
            Self::ProductName => "ProductName",
            Self::Hospital => "Hospital",
            Self::Region => "Region",
            Self::Area => "Area",
            Self::Province => "Province",
            Self::AccountOwner => "AccountOwner",
            Self::TherapeuticGroup => "TherapeuticGroup",
        }
    }

    /// Fields whose cells are coerced to numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Quantity | Self::UnitPrice)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input table a header or mapping belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Tender,
    Catalog,
    PeerGroups,
    Accounts,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tender => "tender",
            Self::Catalog => "catalog",
            Self::PeerGroups => "peer-group",
            Self::Accounts => "account",
        }
    }

    /// Fields without which the table cannot be processed.
    pub fn required_fields(self) -> &'static [CanonicalField] {
        match self {
            Self::Tender => &[CanonicalField::ActiveIngredient, CanonicalField::Strength],
            Self::Catalog => &[
                CanonicalField::ActiveIngredient,
                CanonicalField::Strength,
                CanonicalField::DosageGroup,
                CanonicalField::ProductName,
            ],
            Self::PeerGroups => &[
                CanonicalField::ActiveIngredient,
                CanonicalField::TherapeuticGroup,
            ],
            Self::Accounts => &[CanonicalField::ProductName],
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

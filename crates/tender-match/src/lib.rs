//! Catalog matching for tender rows.
//!
//! [`match_catalog`] performs the left-preserving join on
//! `(key_active, key_strength, key_group)` and reduces the join to one row per
//! tender line; [`enrich_accounts`] then attaches region and account owner
//! from the account reference.

pub mod enrich;
pub mod matcher;

pub use enrich::{AccountIndex, enrich_accounts};
pub use matcher::{
    CatalogIndex, JoinCandidate, MatchOutcome, MatchStats, dedup_first_by_origin, join_candidates,
    match_catalog,
};

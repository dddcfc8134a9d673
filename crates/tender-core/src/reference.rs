//! Reference data: catalog, peer groups and accounts.

use tracing::info;

use tender_map::{account_entries, catalog_entries, peer_group_map};
use tender_model::{
    AccountEntry, CatalogEntry, PeerGroupMap, RawGrid, ReconcileOptions, Result, TableKind,
};

use crate::prepare::prepare_table;

/// The company-side inputs of a reconciliation, built once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub catalog: Vec<CatalogEntry>,
    pub peer_groups: PeerGroupMap,
    pub accounts: Vec<AccountEntry>,
}

impl ReferenceData {
    pub fn new(
        catalog: Vec<CatalogEntry>,
        peer_groups: PeerGroupMap,
        accounts: Vec<AccountEntry>,
    ) -> Self {
        Self {
            catalog,
            peer_groups,
            accounts,
        }
    }

    /// Builds reference data from raw grids. The account reference is optional.
    pub fn from_grids(
        catalog: &RawGrid,
        peer_groups: &RawGrid,
        accounts: Option<&RawGrid>,
        options: &ReconcileOptions,
    ) -> Result<Self> {
        let prepared = prepare_table(catalog, TableKind::Catalog, options)?;
        let catalog = catalog_entries(&prepared.table, &prepared.mapping);

        let prepared = prepare_table(peer_groups, TableKind::PeerGroups, options)?;
        let peer_groups = peer_group_map(&prepared.table, &prepared.mapping);

        let accounts = match accounts {
            Some(grid) => {
                let prepared = prepare_table(grid, TableKind::Accounts, options)?;
                account_entries(&prepared.table, &prepared.mapping)
            }
            None => Vec::new(),
        };

        info!(
            catalog = catalog.len(),
            peer_groups = peer_groups.len(),
            accounts = accounts.len(),
            "reference data loaded"
        );
        Ok(Self::new(catalog, peer_groups, accounts))
    }

    pub fn has_accounts(&self) -> bool {
        !self.accounts.is_empty()
    }
}

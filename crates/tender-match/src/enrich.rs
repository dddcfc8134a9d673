//! Account/region enrichment of matched rows.

use std::collections::HashMap;

use tracing::info;

use tender_model::AccountEntry;
use tender_normalization::fold_text;

use crate::matcher::MatchOutcome;

/// First account entry per folded product name.
#[derive(Debug, Clone, Default)]
pub struct AccountIndex<'a> {
    by_product: HashMap<&'a str, &'a AccountEntry>,
}

impl<'a> AccountIndex<'a> {
    pub fn new(accounts: &'a [AccountEntry]) -> Self {
        let mut by_product = HashMap::new();
        for entry in accounts {
            if entry.key_product.is_empty() {
                continue;
            }
            by_product.entry(entry.key_product.as_str()).or_insert(entry);
        }
        Self { by_product }
    }

    pub fn lookup(&self, product_name: &str) -> Option<&'a AccountEntry> {
        self.by_product.get(fold_text(product_name).as_str()).copied()
    }
}

/// Attaches region and account owner to matched rows.
///
/// Same discipline as the catalog join: every row is kept and receives at
/// most one account entry, the first one listed for its product.
pub fn enrich_accounts(outcome: MatchOutcome, accounts: &[AccountEntry]) -> MatchOutcome {
    let index = AccountIndex::new(accounts);
    let MatchOutcome { rows, mut stats } = outcome;
    let rows = rows
        .into_iter()
        .map(|row| {
            let Some(entry) = row.product_name.as_deref().and_then(|name| index.lookup(name))
            else {
                return row;
            };
            stats.enriched += 1;
            row.with_account(entry.region.clone(), entry.account_owner.clone())
        })
        .collect();
    info!(enriched = stats.enriched, "account enrichment complete");
    MatchOutcome { rows, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(product: &str, region: &str, owner: &str) -> AccountEntry {
        AccountEntry {
            product_name: product.to_string(),
            key_product: fold_text(product),
            region: Some(region.to_string()),
            area: None,
            province: None,
            account_owner: Some(owner.to_string()),
            hospital: None,
            active_ingredient: None,
            key_active: String::new(),
        }
    }

    #[test]
    fn lookup_is_accent_and_case_insensitive_first_wins() {
        let accounts = vec![
            account("Para-X", "Bắc", "HN1"),
            account("PARA-X", "Nam", "HCM"),
        ];
        let index = AccountIndex::new(&accounts);
        let found = index.lookup("para-x").unwrap();
        assert_eq!(found.region.as_deref(), Some("Bắc"));
        assert!(index.lookup("Ibu-Y").is_none());
    }
}

//! Revenue-share ledger.
//!
//! A manuscript's shares map accounts to whole percentages. The ledger
//! enforces that the sum never exceeds the configured cap (100 by default).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::Identity;
use crate::validation::SHARE_CAP;

/// How an update to an account that already holds a share is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareAccounting {
    /// The account's prior share is replaced before the cap check:
    /// `sum(other accounts) + new <= cap`.
    #[default]
    Replace,

    /// The new percentage is checked on top of every current share,
    /// including the account's own prior value, and then overwrites it.
    /// Lowering an existing share can therefore be rejected.
    Additive,
}

/// Percentage allocations for one manuscript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevenueShares(BTreeMap<Identity, u8>);

impl RevenueShares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all current shares.
    pub fn total(&self) -> u32 {
        self.0.values().map(|&p| u32::from(p)).sum()
    }

    /// The share held by `account`, if any.
    pub fn get(&self, account: &Identity) -> Option<u8> {
        self.0.get(account).copied()
    }

    /// Compute the total the cap check is applied to for a proposed update.
    pub fn checked_total(
        &self,
        account: &Identity,
        percentage: u8,
        accounting: ShareAccounting,
    ) -> u32 {
        let current = self.total();
        let proposed = u32::from(percentage);
        match accounting {
            ShareAccounting::Replace => {
                let prior = self.get(account).map(u32::from).unwrap_or(0);
                current - prior + proposed
            }
            ShareAccounting::Additive => current + proposed,
        }
    }

    /// Set `account`'s share, overwriting any prior value.
    ///
    /// Nothing changes if the checked total exceeds `cap`. A cap above
    /// [`SHARE_CAP`] is lowered to it, so no total can pass 100.
    pub fn set(
        &mut self,
        account: Identity,
        percentage: u8,
        accounting: ShareAccounting,
        cap: u32,
    ) -> Result<(), CoreError> {
        let cap = cap.min(SHARE_CAP);
        let total = self.checked_total(&account, percentage, accounting);
        if total > cap {
            return Err(CoreError::ShareLimitExceeded { total, cap });
        }
        self.0.insert(account, percentage);
        Ok(())
    }

    /// Insert without any cap check. Used when loading stored records.
    pub fn insert_unchecked(&mut self, account: Identity, percentage: u8) {
        self.0.insert(account, percentage);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, u8)> {
        self.0.iter().map(|(k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> Identity {
        Identity::from(s)
    }

    #[test]
    fn test_shares_within_cap() {
        let mut shares = RevenueShares::new();
        shares.set(id("a"), 60, ShareAccounting::Replace, SHARE_CAP).unwrap();
        shares.set(id("b"), 40, ShareAccounting::Replace, SHARE_CAP).unwrap();
        assert_eq!(shares.total(), 100);
    }

    #[test]
    fn test_shares_over_cap_rejected_without_change() {
        let mut shares = RevenueShares::new();
        shares.set(id("a"), 60, ShareAccounting::Replace, SHARE_CAP).unwrap();

        let err = shares
            .set(id("b"), 50, ShareAccounting::Replace, SHARE_CAP)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::ShareLimitExceeded { total: 110, cap: 100 }
        ));
        assert_eq!(shares.get(&id("a")), Some(60));
        assert_eq!(shares.get(&id("b")), None);
    }

    #[test]
    fn test_replace_allows_lowering_own_share() {
        let mut shares = RevenueShares::new();
        shares.set(id("a"), 80, ShareAccounting::Replace, SHARE_CAP).unwrap();
        shares.set(id("a"), 70, ShareAccounting::Replace, SHARE_CAP).unwrap();
        assert_eq!(shares.get(&id("a")), Some(70));
        assert_eq!(shares.total(), 70);
    }

    #[test]
    fn test_additive_double_counts_own_share() {
        let mut shares = RevenueShares::new();
        shares.set(id("a"), 80, ShareAccounting::Additive, SHARE_CAP).unwrap();

        // 80 (prior) + 70 (new) > 100, even though the result would be 70.
        let err = shares
            .set(id("a"), 70, ShareAccounting::Additive, SHARE_CAP)
            .unwrap_err();
        assert!(matches!(err, CoreError::ShareLimitExceeded { total: 150, .. }));
        assert_eq!(shares.get(&id("a")), Some(80));

        // Small updates still overwrite rather than increment.
        shares.set(id("a"), 20, ShareAccounting::Additive, SHARE_CAP).unwrap();
        assert_eq!(shares.get(&id("a")), Some(20));
    }

    #[test]
    fn test_percentage_over_cap_alone_rejected() {
        let mut shares = RevenueShares::new();
        assert!(shares
            .set(id("a"), 101, ShareAccounting::Replace, SHARE_CAP)
            .is_err());
        assert!(shares.is_empty());
    }

    #[test]
    fn test_cap_above_hundred_is_lowered() {
        let mut shares = RevenueShares::new();
        let err = shares
            .set(id("a"), 120, ShareAccounting::Replace, 150)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::ShareLimitExceeded { total: 120, cap: 100 }
        ));
        assert!(shares.is_empty());

        shares.set(id("a"), 100, ShareAccounting::Replace, 150).unwrap();
        assert_eq!(shares.total(), 100);
    }

    proptest! {
        #[test]
        fn test_total_never_exceeds_cap(
            updates in prop::collection::vec((0usize..4, any::<u8>(), any::<bool>()), 0..40)
        ) {
            let accounts = ["a", "b", "c", "d"];
            let mut shares = RevenueShares::new();
            for (idx, pct, additive) in updates {
                let accounting = if additive {
                    ShareAccounting::Additive
                } else {
                    ShareAccounting::Replace
                };
                let _ = shares.set(id(accounts[idx]), pct, accounting, SHARE_CAP);
                prop_assert!(shares.total() <= SHARE_CAP);
            }
        }
    }
}

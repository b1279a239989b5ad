//! Net balances folded from expense transactions.
//!
//! Maintains the invariant: the balances of all participants sum to zero.

use crate::amount::Amount;
use crate::transaction::{SplitPolicy, Transaction};
use log::debug;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Signed net position of every participant.
///
/// Positive means the participant owes money overall, negative means they
/// are owed money. Entries are kept in name order so iteration, and anything
/// computed from it, is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balance {
    entries: BTreeMap<String, Amount>,
}

impl Balance {
    /// Creates an empty balance.
    pub fn new() -> Self {
        Balance {
            entries: BTreeMap::new(),
        }
    }

    /// Applies one transaction under `policy`.
    ///
    /// The payer is debited the full amount and every sharing party is
    /// credited one share. Shares are handed out in name order, so the
    /// leftover 0.0001 units of an uneven split always land on the same
    /// people.
    pub fn record(&mut self, tx: &Transaction, policy: SplitPolicy) {
        let mut parties = policy.sharing_parties(tx);
        parties.sort_unstable();
        let shares = tx.amount().split(parties.len());

        *self.entry(tx.payer()) -= tx.amount();
        for (name, share) in parties.into_iter().zip(shares) {
            *self.entry(name) += share;
        }

        debug!(
            "{} paid {} for {} ({:?})",
            tx.payer(),
            tx.amount(),
            tx.beneficiaries().join(" "),
            policy
        );
        debug_assert!(self.check_invariant());
    }

    fn entry(&mut self, name: &str) -> &mut Amount {
        self.entries.entry(name.to_string()).or_default()
    }

    /// Net balance of `name`, or `None` if they never appeared.
    pub fn get(&self, name: &str) -> Option<Amount> {
        self.entries.get(name).copied()
    }

    /// Iterates over all participants in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Amount> {
        self.entries.iter()
    }

    /// Number of participants seen, including settled ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Participants whose balance is not negligible, in name order.
    pub fn outstanding(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.entries
            .iter()
            .filter(|(_, amount)| !amount.is_negligible())
            .map(|(name, amount)| (name.as_str(), *amount))
    }

    /// Returns `true` if nobody owes or is owed anything.
    pub fn is_settled(&self) -> bool {
        self.outstanding().next().is_none()
    }

    /// Sum of all balances. Zero for any balance built from transactions.
    pub fn residual(&self) -> Amount {
        self.entries.values().sum()
    }

    /// Verifies the conservation invariant.
    pub fn check_invariant(&self) -> bool {
        self.residual().is_zero()
    }
}

impl FromIterator<(String, Amount)> for Balance {
    /// Builds a balance from raw entries. Repeated names are added together.
    ///
    /// No conservation check happens here; the settlement planner checks it.
    fn from_iter<I: IntoIterator<Item = (String, Amount)>>(iter: I) -> Self {
        let mut balance = Balance::new();
        for (name, amount) in iter {
            *balance.entries.entry(name).or_default() += amount;
        }
        balance
    }
}

impl<'a> IntoIterator for &'a Balance {
    type Item = (&'a String, &'a Amount);
    type IntoIter = btree_map::Iter<'a, String, Amount>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Folds `transactions` into a fresh balance under `policy`.
pub fn accumulate<'a, I>(transactions: I, policy: SplitPolicy) -> Balance
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut balance = Balance::new();
    for tx in transactions {
        balance.record(tx, policy);
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::parse_line;
    use std::str::FromStr;

    fn dec(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn txs(lines: &[&str]) -> Vec<Transaction> {
        lines
            .iter()
            .map(|l| parse_line(l).unwrap().unwrap())
            .collect()
    }

    #[test]
    fn test_empty_input_gives_empty_balance() {
        let balance = accumulate(&Vec::<Transaction>::new(), SplitPolicy::Exclusive);
        assert!(balance.is_empty());
        assert!(balance.is_settled());
        assert!(balance.residual().is_zero());
    }

    #[test]
    fn test_exclusive_split() {
        let balance = accumulate(&txs(&["Ben 40 Ben Lila Carlos Emil"]), SplitPolicy::Exclusive);

        assert_eq!(balance.get("Ben"), Some(dec("-30")));
        assert_eq!(balance.get("Lila"), Some(dec("10")));
        assert_eq!(balance.get("Carlos"), Some(dec("10")));
        assert_eq!(balance.get("Emil"), Some(dec("10")));
        assert!(balance.check_invariant());
    }

    #[test]
    fn test_inclusive_split() {
        let balance = accumulate(&txs(&["Ben 30 Lila Carlos"]), SplitPolicy::Inclusive);

        assert_eq!(balance.get("Ben"), Some(dec("-20")));
        assert_eq!(balance.get("Lila"), Some(dec("10")));
        assert_eq!(balance.get("Carlos"), Some(dec("10")));
    }

    #[test]
    fn test_uneven_split_conserves_exactly() {
        let balance = accumulate(&txs(&["Ann 10 Cat Bob Dan"]), SplitPolicy::Exclusive);

        // leftover unit goes to the first name in order
        assert_eq!(balance.get("Bob"), Some(dec("3.3334")));
        assert_eq!(balance.get("Cat"), Some(dec("3.3333")));
        assert_eq!(balance.get("Dan"), Some(dec("3.3333")));
        assert!(balance.residual().is_zero());
    }

    #[test]
    fn test_duplicate_beneficiary_gets_two_shares() {
        let balance = accumulate(&txs(&["Ann 9 Bob Bob Cat"]), SplitPolicy::Exclusive);
        assert_eq!(balance.get("Bob"), Some(dec("6")));
        assert_eq!(balance.get("Cat"), Some(dec("3")));
    }

    #[test]
    fn test_cancelling_transactions_settle() {
        let balance = accumulate(&txs(&["A 10 B", "B 10 A"]), SplitPolicy::Exclusive);
        assert_eq!(balance.len(), 2);
        assert!(balance.is_settled());
    }

    #[test]
    fn test_order_does_not_change_result() {
        let lines = [
            "Ben 45.67 Ben Reed Sonia",
            "Reed 78 Sonia Ben",
            "Sonia 33.2 Sonia Ben Reed",
        ];
        let forward = accumulate(&txs(&lines), SplitPolicy::Exclusive);

        let mut reversed_lines = lines.to_vec();
        reversed_lines.reverse();
        let backward = accumulate(&txs(&reversed_lines), SplitPolicy::Exclusive);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_from_iter_merges_names() {
        let balance: Balance = vec![
            ("A".to_string(), dec("5")),
            ("A".to_string(), dec("5")),
            ("B".to_string(), dec("-10")),
        ]
        .into_iter()
        .collect();

        assert_eq!(balance.get("A"), Some(dec("10")));
        assert!(balance.residual().is_zero());
    }

    #[test]
    fn test_outstanding_skips_negligible_entries() {
        let balance: Balance = vec![
            ("A".to_string(), dec("0.0001")),
            ("B".to_string(), dec("5")),
            ("C".to_string(), dec("-5.0001")),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = balance.outstanding().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "C"]);
    }
}

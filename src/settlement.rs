//! Settlement planning.
//!
//! Turns a balance into the fewest payments that bring everybody back to
//! zero by greedily matching debtors against creditors.

use crate::amount::Amount;
use crate::error::{FairsplitError, Result};
use crate::ledger::Balance;
use log::debug;
use serde::Serialize;

/// One payment instruction: `debtor` pays `amount` to `creditor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementEdge {
    pub debtor: String,
    pub creditor: String,
    pub amount: Amount,
}

/// The full set of payments for one run.
///
/// Edges are ordered by debtor name, then by creditor name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementPlan {
    edges: Vec<SettlementEdge>,
    waived: Amount,
}

impl SettlementPlan {
    pub fn edges(&self) -> &[SettlementEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Total of transfers too small to be worth a payment.
    ///
    /// Each participant's balance after [`SettlementPlan::apply`] is at most
    /// this far from zero.
    pub fn waived(&self) -> Amount {
        self.waived
    }

    /// Returns `true` if nobody has to pay anybody.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Groups consecutive edges by debtor, keeping plan order.
    pub fn by_debtor(&self) -> Vec<(&str, Vec<&SettlementEdge>)> {
        let mut groups: Vec<(&str, Vec<&SettlementEdge>)> = Vec::new();
        for edge in &self.edges {
            match groups.last_mut() {
                Some((debtor, group)) if *debtor == edge.debtor => group.push(edge),
                _ => groups.push((edge.debtor.as_str(), vec![edge])),
            }
        }
        groups
    }

    /// Returns `balance` as it stands once every payment has been made.
    ///
    /// A paying debtor's balance goes down; a paid creditor's goes up.
    pub fn apply(&self, balance: &Balance) -> Balance {
        let mut entries: Vec<(String, Amount)> = balance
            .iter()
            .map(|(name, amount)| (name.clone(), *amount))
            .collect();
        for edge in &self.edges {
            entries.push((edge.debtor.clone(), -edge.amount));
            entries.push((edge.creditor.clone(), edge.amount));
        }
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a SettlementEdge;
    type IntoIter = std::slice::Iter<'a, SettlementEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// A participant's open amount during the scan.
#[derive(Debug)]
struct Position<'a> {
    name: &'a str,
    remaining: Amount,
}

/// Computes the settlement plan for `balance`.
///
/// Debtors and creditors are each taken in name order. The current debtor
/// pays the current creditor the smaller of their two open amounts, and
/// whichever side is exhausted moves on. This yields at most
/// `debtors + creditors - 1` payments. Transfers below [`Amount::EPSILON`]
/// are waived rather than emitted; their total is kept in
/// [`SettlementPlan::waived`].
///
/// # Errors
///
/// [`FairsplitError::ConservationViolated`] if the balances do not sum to
/// zero, [`FairsplitError::UnsettledResidual`] if more than a negligible
/// amount is left open once one side runs out. Both indicate a bug upstream;
/// no partial plan is returned.
pub fn settle(balance: &Balance) -> Result<SettlementPlan> {
    let residual = balance.residual();
    if !residual.is_negligible() {
        return Err(FairsplitError::ConservationViolated { residual });
    }

    // Balance iterates in name order, so both sides come out sorted. Small
    // balances stay in the scan so their transfers are matched and waived
    // instead of being stranded on the other side.
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();
    for (name, amount) in balance {
        if amount.is_positive() {
            debtors.push(Position {
                name,
                remaining: *amount,
            });
        } else if amount.is_negative() {
            creditors.push(Position {
                name,
                remaining: -*amount,
            });
        }
    }

    scan(debtors, creditors)
}

/// Matches sorted debtors against sorted creditors.
fn scan(
    mut debtors: Vec<Position<'_>>,
    mut creditors: Vec<Position<'_>>,
) -> Result<SettlementPlan> {
    let mut edges = Vec::new();
    let mut waived = Amount::ZERO;
    let mut d = 0;
    let mut c = 0;

    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];

        let transfer = debtor.remaining.min(creditor.remaining);
        if transfer.is_negligible() {
            waived += transfer;
        } else {
            debug!("{} pays {} to {}", debtor.name, transfer, creditor.name);
            edges.push(SettlementEdge {
                debtor: debtor.name.to_string(),
                creditor: creditor.name.to_string(),
                amount: transfer,
            });
        }

        debtor.remaining -= transfer;
        creditor.remaining -= transfer;

        // Fixed-point subtraction is exact: the smaller side lands on zero.
        if debtor.remaining.is_zero() {
            d += 1;
        }
        if creditor.remaining.is_zero() {
            c += 1;
        }
    }

    // Only one side can still be open here.
    let open_positions: Vec<&Position<'_>> =
        debtors[d..].iter().chain(creditors[c..].iter()).collect();
    let open: Amount = open_positions.iter().map(|position| position.remaining).sum();
    if !open.is_negligible() {
        return Err(FairsplitError::UnsettledResidual {
            name: open_positions[0].name.to_string(),
            remaining: open,
        });
    }
    waived += open;

    Ok(SettlementPlan { edges, waived })
}

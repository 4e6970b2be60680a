//! Debt simplification
//!
//! Turns the group-wide net balances into a small set of payments that would
//! bring everyone to zero: repeatedly match the largest debtor with the
//! largest creditor and transfer the smaller of the two magnitudes.
//!
//! Greedy matching does not always yield the provably-minimal transaction
//! count (that problem is NP-hard in general), but it is deterministic,
//! emits at most one transfer per eliminated party, and is easily small
//! enough for household-sized groups. Ties are broken by member id so the
//! output is reproducible.

use crate::models::{MemberId, Money};

use super::balance::MemberBalance;

/// A suggested payment that helps zero out the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedTransfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// Compute a settle-up plan from the current net balances.
///
/// Members already at zero are skipped. Applying every emitted transfer as a
/// hypothetical settlement yields all-zero net balances, and the transfer
/// count never exceeds (number of nonzero balances - 1) when the input sums
/// to zero.
pub fn simplify_debts(balances: &[MemberBalance]) -> Vec<SuggestedTransfer> {
    // (id, magnitude) lists; debtors hold abs(net) of negative balances
    let mut debtors: Vec<(MemberId, Money)> = balances
        .iter()
        .filter(|b| b.net.is_negative())
        .map(|b| (b.member_id, b.net.abs()))
        .collect();
    let mut creditors: Vec<(MemberId, Money)> = balances
        .iter()
        .filter(|b| b.net.is_positive())
        .map(|b| (b.member_id, b.net))
        .collect();

    let mut transfers = Vec::new();

    while !debtors.is_empty() && !creditors.is_empty() {
        let di = index_of_largest(&debtors);
        let ci = index_of_largest(&creditors);

        let amount = debtors[di].1.min(creditors[ci].1);
        transfers.push(SuggestedTransfer {
            from: debtors[di].0,
            to: creditors[ci].0,
            amount,
        });

        debtors[di].1 -= amount;
        creditors[ci].1 -= amount;

        if debtors[di].1.is_zero() {
            debtors.swap_remove(di);
        }
        if creditors[ci].1.is_zero() {
            creditors.swap_remove(ci);
        }
    }

    transfers
}

/// Index of the entry with the largest magnitude, smallest id winning ties
fn index_of_largest(entries: &[(MemberId, Money)]) -> usize {
    let mut best = 0;
    for (idx, entry) in entries.iter().enumerate().skip(1) {
        let (best_id, best_amount) = entries[best];
        if entry.1 > best_amount || (entry.1 == best_amount && entry.0 < best_id) {
            best = idx;
        }
    }
    best
}

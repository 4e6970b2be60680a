//! Group balance computation
//!
//! Folds the full record set (expenses with splits, settlements) into one net
//! balance per member. Pure and deterministic: identical inputs always produce
//! identical output, so callers recompute on every read instead of caching.
//!
//! The ledger is a closed zero-sum system. Every cent paid by someone is owed
//! by someone, and every settlement cancels equally on both sides, so the net
//! balances of a consistent group always sum to zero. Records referencing
//! unknown members break that closure; they are reported as inconsistencies
//! rather than dropped or repaired, since they are the primary signal of
//! ledger corruption.

use std::collections::BTreeMap;

use crate::models::{Expense, ExpenseId, Member, MemberId, Money, Settlement, SettlementId};

/// A member's computed position in the group ledger
///
/// Never persisted; always derived fresh from the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberBalance {
    pub member_id: MemberId,

    /// Total of expenses this member paid
    pub total_paid: Money,

    /// Total of shares assigned to this member across all expenses
    pub total_share: Money,

    /// Total of settlements this member sent
    pub total_settled_out: Money,

    /// Total of settlements this member received
    pub total_settled_in: Money,

    /// Net position: positive = owed money, negative = owes money
    pub net: Money,
}

impl MemberBalance {
    fn zeroed(member_id: MemberId) -> Self {
        Self {
            member_id,
            total_paid: Money::zero(),
            total_share: Money::zero(),
            total_settled_out: Money::zero(),
            total_settled_in: Money::zero(),
            net: Money::zero(),
        }
    }
}

/// A data problem found while reducing the records
///
/// These indicate upstream corruption (e.g., a member deleted while owing
/// money), not core-logic bugs. They are data in the result, never errors:
/// a balance view must always render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// An expense's payer is not in the member list
    UnknownPayer {
        expense_id: ExpenseId,
        member_id: MemberId,
    },
    /// A split references a member not in the member list
    UnknownSplitMember {
        expense_id: ExpenseId,
        member_id: MemberId,
    },
    /// A settlement party is not in the member list
    UnknownSettlementParty {
        settlement_id: SettlementId,
        member_id: MemberId,
    },
    /// An expense's splits do not sum to its amount
    SplitSumMismatch {
        expense_id: ExpenseId,
        amount: Money,
        splits_total: Money,
    },
}

impl std::fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPayer {
                expense_id,
                member_id,
            } => write!(f, "Expense {} paid by unknown member {}", expense_id, member_id),
            Self::UnknownSplitMember {
                expense_id,
                member_id,
            } => write!(f, "Expense {} has a split for unknown member {}", expense_id, member_id),
            Self::UnknownSettlementParty {
                settlement_id,
                member_id,
            } => write!(f, "Settlement {} involves unknown member {}", settlement_id, member_id),
            Self::SplitSumMismatch {
                expense_id,
                amount,
                splits_total,
            } => write!(
                f,
                "Expense {} splits sum to {} but amount is {}",
                expense_id, splits_total, amount
            ),
        }
    }
}

/// Result of a group balance computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    /// One entry per known member, ordered by member id
    pub balances: Vec<MemberBalance>,

    /// Sum of all net balances; exactly zero for a consistent ledger
    pub sum_of_balances: Money,

    /// True iff the sum is zero and no inconsistencies were found
    pub invariant_valid: bool,

    /// Data problems found during the reduction
    pub inconsistencies: Vec<Inconsistency>,
}

impl BalanceReport {
    /// Look up a member's balance in the report
    pub fn balance_of(&self, member_id: MemberId) -> Option<&MemberBalance> {
        self.balances.iter().find(|b| b.member_id == member_id)
    }
}

/// Compute net balances for every member of the group.
///
/// Members with no transactions appear with all-zero fields. Amounts tied to
/// unknown member ids are excluded from the per-member rows and reported as
/// inconsistencies; the resulting nonzero sum then flags the invariant.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> BalanceReport {
    // BTreeMap keyed by MemberId keeps iteration order stable, so the output
    // ordering is reproducible across calls.
    let mut accumulators: BTreeMap<MemberId, MemberBalance> = members
        .iter()
        .map(|m| (m.id, MemberBalance::zeroed(m.id)))
        .collect();
    let mut inconsistencies = Vec::new();

    for expense in expenses {
        match accumulators.get_mut(&expense.payer_id) {
            Some(acc) => acc.total_paid += expense.amount,
            None => inconsistencies.push(Inconsistency::UnknownPayer {
                expense_id: expense.id,
                member_id: expense.payer_id,
            }),
        }

        for split in &expense.splits {
            match accumulators.get_mut(&split.member_id) {
                Some(acc) => acc.total_share += split.share,
                None => inconsistencies.push(Inconsistency::UnknownSplitMember {
                    expense_id: expense.id,
                    member_id: split.member_id,
                }),
            }
        }

        // Re-check split conservation as a read-time diagnostic. Write-time
        // validation should have enforced it; a mismatch here means the
        // stored data was edited out from under us.
        let splits_total = expense.splits_total();
        if splits_total != expense.amount {
            inconsistencies.push(Inconsistency::SplitSumMismatch {
                expense_id: expense.id,
                amount: expense.amount,
                splits_total,
            });
        }
    }

    for settlement in settlements {
        match accumulators.get_mut(&settlement.from_member) {
            Some(acc) => acc.total_settled_out += settlement.amount,
            None => inconsistencies.push(Inconsistency::UnknownSettlementParty {
                settlement_id: settlement.id,
                member_id: settlement.from_member,
            }),
        }
        match accumulators.get_mut(&settlement.to_member) {
            Some(acc) => acc.total_settled_in += settlement.amount,
            None => inconsistencies.push(Inconsistency::UnknownSettlementParty {
                settlement_id: settlement.id,
                member_id: settlement.to_member,
            }),
        }
    }

    let balances: Vec<MemberBalance> = accumulators
        .into_values()
        .map(|mut acc| {
            acc.net = (acc.total_paid - acc.total_share)
                + (acc.total_settled_out - acc.total_settled_in);
            acc
        })
        .collect();

    let sum_of_balances: Money = balances.iter().map(|b| b.net).sum();
    let invariant_valid = sum_of_balances.is_zero() && inconsistencies.is_empty();

    BalanceReport {
        balances,
        sum_of_balances,
        invariant_valid,
        inconsistencies,
    }
}

//! Pairwise breakdown between two members
//!
//! Re-scans the raw records to itemize exactly why two members owe each other
//! what they do. Read-only and side-effect free; used for detail views and
//! as the debt ceiling for settlement validation.

use crate::models::{Expense, ExpenseId, MemberId, Money, Settlement, SettlementId};
use chrono::NaiveDate;

/// One expense line contributing to a pairwise balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseExpense {
    pub expense_id: ExpenseId,
    pub date: NaiveDate,
    pub description: String,
    /// The debtor's share of this expense
    pub share: Money,
}

/// One settlement line between the pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseSettlement {
    pub settlement_id: SettlementId,
    pub date: NaiveDate,
    pub amount: Money,
}

/// Itemized mutual position of two members (A = the queried member, B = the other)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseBreakdown {
    /// Expenses B paid where A has a positive share: A owes these
    pub they_paid_you_owe: Vec<PairwiseExpense>,

    /// Expenses A paid where B has a positive share: B owes these
    pub you_paid_they_owe: Vec<PairwiseExpense>,

    /// Settlements A already made to B
    pub settlements_sent: Vec<PairwiseSettlement>,

    /// Settlements B already made to A
    pub settlements_received: Vec<PairwiseSettlement>,

    /// Net pairwise position: positive = A owes B, negative = B owes A,
    /// zero = settled between this pair
    pub net: Money,
}

impl PairwiseBreakdown {
    /// The outstanding debt A still owes B (never negative)
    pub fn owed_by_you(&self) -> Money {
        if self.net.is_positive() {
            self.net
        } else {
            Money::zero()
        }
    }
}

/// Itemize the mutual balance between members `a` and `b`.
///
/// Only the direct relationship is considered; debts routed through other
/// members are invisible here by design and belong to the group-wide view.
pub fn pairwise_breakdown(
    expenses: &[Expense],
    settlements: &[Settlement],
    a: MemberId,
    b: MemberId,
) -> PairwiseBreakdown {
    let mut they_paid_you_owe = Vec::new();
    let mut you_paid_they_owe = Vec::new();

    for expense in expenses {
        if expense.payer_id == b {
            let share = expense.share_of(a);
            if share.is_positive() {
                they_paid_you_owe.push(PairwiseExpense {
                    expense_id: expense.id,
                    date: expense.date,
                    description: expense.description.clone(),
                    share,
                });
            }
        } else if expense.payer_id == a {
            let share = expense.share_of(b);
            if share.is_positive() {
                you_paid_they_owe.push(PairwiseExpense {
                    expense_id: expense.id,
                    date: expense.date,
                    description: expense.description.clone(),
                    share,
                });
            }
        }
    }

    let mut settlements_sent = Vec::new();
    let mut settlements_received = Vec::new();

    for settlement in settlements {
        if settlement.from_member == a && settlement.to_member == b {
            settlements_sent.push(PairwiseSettlement {
                settlement_id: settlement.id,
                date: settlement.date,
                amount: settlement.amount,
            });
        } else if settlement.from_member == b && settlement.to_member == a {
            settlements_received.push(PairwiseSettlement {
                settlement_id: settlement.id,
                date: settlement.date,
                amount: settlement.amount,
            });
        }
    }

    let you_owe: Money = they_paid_you_owe.iter().map(|e| e.share).sum();
    let they_owe: Money = you_paid_they_owe.iter().map(|e| e.share).sum();
    let sent: Money = settlements_sent.iter().map(|s| s.amount).sum();
    let received: Money = settlements_received.iter().map(|s| s.amount).sum();

    let net = (you_owe - sent) - (they_owe - received);

    PairwiseBreakdown {
        they_paid_you_owe,
        you_paid_they_owe,
        settlements_sent,
        settlements_received,
        net,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Split;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    #[test]
    fn test_empty_records() {
        let a = MemberId::new();
        let b = MemberId::new();
        let breakdown = pairwise_breakdown(&[], &[], a, b);

        assert!(breakdown.net.is_zero());
        assert!(breakdown.they_paid_you_owe.is_empty());
        assert!(breakdown.owed_by_you().is_zero());
    }

    #[test]
    fn test_one_sided_debt() {
        let a = MemberId::new();
        let b = MemberId::new();
        // B paid 2000; A's share is 1000
        let expense = Expense::new(
            b,
            Money::from_cents(2000),
            vec![
                Split::new(a, Money::from_cents(1000)),
                Split::new(b, Money::from_cents(1000)),
            ],
            date(),
            "Utilities",
        );

        let breakdown = pairwise_breakdown(&[expense], &[], a, b);

        assert_eq!(breakdown.they_paid_you_owe.len(), 1);
        assert_eq!(breakdown.net.cents(), 1000);
        assert_eq!(breakdown.owed_by_you().cents(), 1000);
    }

    #[test]
    fn test_mutual_debts_offset() {
        let a = MemberId::new();
        let b = MemberId::new();
        let b_paid = Expense::new(
            b,
            Money::from_cents(2000),
            vec![
                Split::new(a, Money::from_cents(1000)),
                Split::new(b, Money::from_cents(1000)),
            ],
            date(),
            "Utilities",
        );
        let a_paid = Expense::new(
            a,
            Money::from_cents(600),
            vec![
                Split::new(a, Money::from_cents(300)),
                Split::new(b, Money::from_cents(300)),
            ],
            date(),
            "Coffee run",
        );

        let breakdown = pairwise_breakdown(&[b_paid, a_paid], &[], a, b);

        // A owes 1000, B owes 300 -> A net-owes 700
        assert_eq!(breakdown.net.cents(), 700);
    }

    #[test]
    fn test_settlements_reduce_net() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = Expense::new(
            b,
            Money::from_cents(2000),
            vec![
                Split::new(a, Money::from_cents(1000)),
                Split::new(b, Money::from_cents(1000)),
            ],
            date(),
            "Utilities",
        );
        let payment = Settlement::new(a, b, Money::from_cents(400), date());

        let breakdown = pairwise_breakdown(&[expense], &[payment], a, b);

        assert_eq!(breakdown.settlements_sent.len(), 1);
        assert_eq!(breakdown.net.cents(), 600);
    }

    #[test]
    fn test_net_is_antisymmetric() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = Expense::new(
            b,
            Money::from_cents(900),
            vec![
                Split::new(a, Money::from_cents(450)),
                Split::new(b, Money::from_cents(450)),
            ],
            date(),
            "Pizza",
        );
        let payment = Settlement::new(a, b, Money::from_cents(100), date());

        let ab = pairwise_breakdown(&[expense.clone()], &[payment.clone()], a, b);
        let ba = pairwise_breakdown(&[expense], &[payment], b, a);

        assert_eq!(ab.net, -ba.net);
        // B is the creditor, so from B's side nothing is owed
        assert!(ba.owed_by_you().is_zero());
    }

    #[test]
    fn test_third_party_records_ignored() {
        let a = MemberId::new();
        let b = MemberId::new();
        let c = MemberId::new();
        let expense = Expense::new(
            c,
            Money::from_cents(1500),
            vec![
                Split::new(a, Money::from_cents(750)),
                Split::new(c, Money::from_cents(750)),
            ],
            date(),
            "Not B's business",
        );
        let payment = Settlement::new(c, a, Money::from_cents(200), date());

        let breakdown = pairwise_breakdown(&[expense], &[payment], a, b);

        assert!(breakdown.net.is_zero());
        assert!(breakdown.they_paid_you_owe.is_empty());
        assert!(breakdown.settlements_received.is_empty());
    }

    #[test]
    fn test_zero_share_not_itemized() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = Expense::new(
            b,
            Money::from_cents(1000),
            vec![
                Split::new(a, Money::zero()),
                Split::new(b, Money::from_cents(1000)),
            ],
            date(),
            "B's own thing",
        );

        let breakdown = pairwise_breakdown(&[expense], &[], a, b);

        assert!(breakdown.they_paid_you_owe.is_empty());
        assert!(breakdown.net.is_zero());
    }
}

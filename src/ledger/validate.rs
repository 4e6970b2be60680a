//! Settlement validation
//!
//! Checks a proposed payment against the ledger before it is persisted. The
//! check is deliberately *pairwise*: it bounds the amount by what the payer
//! directly owes the payee, not by the payer's group-wide net. A payer who is
//! a net creditor overall can still legitimately settle a direct debt to one
//! housemate, and an overpayment is refused even when group netting would
//! absorb it.
//!
//! Validation failures are user-correctable input errors, never fatal. The
//! calling layer is responsible for logging rejections and for making the
//! validate-then-insert pair atomic against one snapshot.

use crate::models::{Expense, Member, MemberId, Money, Settlement};

use super::pairwise::pairwise_breakdown;

/// Outcome of a settlement validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementCheck {
    pub valid: bool,

    /// Human-readable rejection reason when invalid
    pub error: Option<String>,

    /// What the payer currently owes the payee directly (never negative)
    pub pairwise_owed: Money,
}

impl SettlementCheck {
    fn ok(pairwise_owed: Money) -> Self {
        Self {
            valid: true,
            error: None,
            pairwise_owed,
        }
    }

    fn reject(error: impl Into<String>, pairwise_owed: Money) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            pairwise_owed,
        }
    }
}

/// Validate a proposed settlement of `amount` from `from` to `to`.
///
/// Rules, in order: no self-settlement, positive amount, both members known,
/// and the amount must not exceed the direct pairwise debt. Exact repayment
/// is allowed; there is no tolerance above it.
pub fn validate_settlement(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
    from: MemberId,
    to: MemberId,
    amount: Money,
) -> SettlementCheck {
    if from == to {
        return SettlementCheck::reject("Cannot settle with yourself.", Money::zero());
    }

    if !amount.is_positive() {
        return SettlementCheck::reject("Amount must be positive.", Money::zero());
    }

    let from_member = members.iter().find(|m| m.id == from);
    let to_member = members.iter().find(|m| m.id == to);
    let (payer, payee) = match (from_member, to_member) {
        (Some(payer), Some(payee)) => (payer, payee),
        (None, _) => {
            return SettlementCheck::reject(
                format!("Paying member {} is not in the household.", from),
                Money::zero(),
            )
        }
        (_, None) => {
            return SettlementCheck::reject(
                format!("Receiving member {} is not in the household.", to),
                Money::zero(),
            )
        }
    };

    let breakdown = pairwise_breakdown(expenses, settlements, from, to);
    let owed = breakdown.owed_by_you();

    if owed.is_zero() {
        return SettlementCheck::reject(
            format!("{} does not currently owe {} anything.", payer.name, payee.name),
            owed,
        );
    }

    if amount > owed {
        return SettlementCheck::reject(
            format!(
                "{} exceeds what {} owes {} ({}).",
                amount, payer.name, payee.name, owed
            ),
            owed,
        );
    }

    SettlementCheck::ok(owed)
}

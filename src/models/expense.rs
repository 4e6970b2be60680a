//! Expense model
//!
//! Represents a shared expense paid by one member and split across members.
//! The core invariant is split conservation: the shares must sum to exactly
//! the expense amount, enforced at write time and re-checked on read by the
//! ledger as a diagnostic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::ids::{ExpenseId, MemberId};
use super::money::Money;
use super::month::Month;

/// One member's assigned share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The member who owes this share
    pub member_id: MemberId,

    /// Share amount in cents (non-negative; zero means "recorded as not owing")
    pub share: Money,
}

impl Split {
    /// Create a new split
    pub fn new(member_id: MemberId, share: Money) -> Self {
        Self { member_id, share }
    }
}

/// A shared expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The member who paid
    pub payer_id: MemberId,

    /// Total amount paid (always positive)
    pub amount: Money,

    /// Per-member shares; must sum to `amount`
    pub splits: Vec<Split>,

    /// Date of the expense
    pub date: NaiveDate,

    /// Billing month label
    pub month: Month,

    /// What the expense was for
    pub description: String,

    /// Optional category (e.g., "Groceries")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Recurring expense flag (e.g., rent, internet)
    #[serde(default)]
    pub recurring: bool,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        payer_id: MemberId,
        amount: Money,
        splits: Vec<Split>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            payer_id,
            amount,
            splits,
            date,
            month: Month::of(date),
            description: description.into(),
            category: None,
            recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the total of all splits (must equal the expense amount)
    pub fn splits_total(&self) -> Money {
        self.splits.iter().map(|s| s.share).sum()
    }

    /// Get the share assigned to a member (zero if absent)
    pub fn share_of(&self, member_id: MemberId) -> Money {
        self.splits
            .iter()
            .find(|s| s.member_id == member_id)
            .map(|s| s.share)
            .unwrap_or_else(Money::zero)
    }

    /// Replace the splits and update the modification stamp
    pub fn set_splits(&mut self, splits: Vec<Split>) {
        self.splits = splits;
        self.updated_at = Utc::now();
    }

    /// Validate the expense
    ///
    /// Checked at write time; the ledger re-checks split conservation on read
    /// and reports mismatches as inconsistencies rather than repairing them.
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.splits.is_empty() {
            return Err(ExpenseValidationError::NoSplits);
        }

        for split in &self.splits {
            if split.share.is_negative() {
                return Err(ExpenseValidationError::NegativeShare {
                    member_id: split.member_id,
                    share: split.share,
                });
            }
        }

        let mut seen = HashSet::new();
        for split in &self.splits {
            if !seen.insert(split.member_id) {
                return Err(ExpenseValidationError::DuplicateMember(split.member_id));
            }
        }

        let splits_total = self.splits_total();
        if splits_total != self.amount {
            return Err(ExpenseValidationError::SplitsMismatch {
                amount: self.amount,
                splits_total,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    NoSplits,
    NegativeShare { member_id: MemberId, share: Money },
    DuplicateMember(MemberId),
    SplitsMismatch { amount: Money, splits_total: Money },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive (got {})", amount)
            }
            Self::NoSplits => write!(f, "Expense must have at least one split"),
            Self::NegativeShare { member_id, share } => {
                write!(f, "Split for member {} is negative ({})", member_id, share)
            }
            Self::DuplicateMember(member_id) => {
                write!(f, "Member {} appears more than once in splits", member_id)
            }
            Self::SplitsMismatch {
                amount,
                splits_total,
            } => write!(
                f,
                "Split totals ({}) do not match expense amount ({})",
                splits_total, amount
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_new_expense() {
        let payer = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(3000),
            vec![Split::new(payer, Money::from_cents(3000))],
            test_date(),
            "Groceries",
        );

        assert_eq!(expense.payer_id, payer);
        assert_eq!(expense.amount.cents(), 3000);
        assert_eq!(expense.month, Month::new(2025, 1).unwrap());
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_splits_must_sum_to_amount() {
        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(3000),
            vec![
                Split::new(payer, Money::from_cents(1000)),
                Split::new(other, Money::from_cents(1000)),
            ],
            test_date(),
            "Groceries",
        );

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::SplitsMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_share_is_allowed() {
        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(3000),
            vec![
                Split::new(payer, Money::from_cents(3000)),
                Split::new(other, Money::zero()),
            ],
            test_date(),
            "Groceries",
        );

        assert!(expense.validate().is_ok());
        assert_eq!(expense.share_of(other), Money::zero());
    }

    #[test]
    fn test_negative_share_rejected() {
        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(1000),
            vec![
                Split::new(payer, Money::from_cents(2000)),
                Split::new(other, Money::from_cents(-1000)),
            ],
            test_date(),
            "Refund shenanigans",
        );

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::NegativeShare { .. })
        ));
    }

    #[test]
    fn test_duplicate_split_member_rejected() {
        let payer = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(1000),
            vec![
                Split::new(payer, Money::from_cents(500)),
                Split::new(payer, Money::from_cents(500)),
            ],
            test_date(),
            "Double entry",
        );

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::DuplicateMember(_))
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let payer = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::zero(),
            vec![Split::new(payer, Money::zero())],
            test_date(),
            "Nothing",
        );

        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_share_of_absent_member_is_zero() {
        let payer = MemberId::new();
        let stranger = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(1000),
            vec![Split::new(payer, Money::from_cents(1000))],
            test_date(),
            "Solo purchase",
        );

        assert_eq!(expense.share_of(stranger), Money::zero());
    }

    #[test]
    fn test_serialization() {
        let payer = MemberId::new();
        let expense = Expense::new(
            payer,
            Money::from_cents(2500),
            vec![Split::new(payer, Money::from_cents(2500))],
            test_date(),
            "Internet",
        );

        let json = serde_json::to_string(&expense).unwrap();
        let deserialized: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(expense.id, deserialized.id);
        assert_eq!(expense.amount, deserialized.amount);
        assert_eq!(expense.splits, deserialized.splits);
    }
}

//! Settlement model
//!
//! Records a payment between two members that reduces their mutual debt.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MemberId, SettlementId};
use super::money::Money;
use super::month::Month;

/// A payment from one member to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// The member who paid
    pub from_member: MemberId,

    /// The member who received the payment
    pub to_member: MemberId,

    /// Amount paid (always positive)
    pub amount: Money,

    /// Date of the payment
    pub date: NaiveDate,

    /// Billing month label
    pub month: Month,

    /// Optional note (e.g., "venmo")
    #[serde(default)]
    pub note: String,

    /// When the settlement was recorded
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a new settlement
    pub fn new(from_member: MemberId, to_member: MemberId, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: SettlementId::new(),
            from_member,
            to_member,
            amount,
            date,
            month: Month::of(date),
            note: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Validate the settlement record
    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if self.from_member == self.to_member {
            return Err(SettlementValidationError::SelfSettlement(self.from_member));
        }
        if !self.amount.is_positive() {
            return Err(SettlementValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.date.format("%Y-%m-%d"),
            self.from_member,
            self.to_member,
            self.amount
        )
    }
}

/// Validation errors for settlement records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    SelfSettlement(MemberId),
    NonPositiveAmount(Money),
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfSettlement(_) => write!(f, "Cannot settle with yourself."),
            Self::NonPositiveAmount(_) => write!(f, "Amount must be positive."),
        }
    }
}

impl std::error::Error for SettlementValidationError {}

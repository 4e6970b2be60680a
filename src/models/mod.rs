//! Core data models for roomledger
//!
//! This module contains all the data structures that represent the shared
//! household domain: members, expenses with per-member splits, and
//! settlements between members.

pub mod expense;
pub mod ids;
pub mod member;
pub mod money;
pub mod month;
pub mod settlement;

pub use expense::{Expense, ExpenseValidationError, Split};
pub use ids::{ExpenseId, MemberId, SettlementId};
pub use member::Member;
pub use money::Money;
pub use month::Month;
pub use settlement::{Settlement, SettlementValidationError};

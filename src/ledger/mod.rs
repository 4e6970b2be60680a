//! Ledger core
//!
//! Pure functions over the raw records: balance computation, settlement
//! validation, debt simplification, and pairwise itemization. Nothing in
//! here touches storage; callers load a snapshot and pass slices in, which
//! keeps every computation deterministic and trivially testable.

pub mod balance;
pub mod pairwise;
pub mod simplify;
pub mod validate;

pub use balance::{compute_balances, BalanceReport, Inconsistency, MemberBalance};
pub use pairwise::{pairwise_breakdown, PairwiseBreakdown, PairwiseExpense, PairwiseSettlement};
pub use simplify::{simplify_debts, SuggestedTransfer};
pub use validate::{validate_settlement, SettlementCheck};

//! Service layer for roomledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging, and cross-entity operations.

pub mod balance;
pub mod expense;
pub mod member;
pub mod settlement;

pub use balance::BalanceService;
pub use expense::ExpenseService;
pub use member::MemberService;
pub use settlement::SettlementService;

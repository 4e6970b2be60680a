//! Display formatting
//!
//! Formats data for CLI output. These modules handle the presentation layer,
//! converting ledger data into user-friendly terminal tables.

pub mod balance;
pub mod expense;

pub use balance::{format_balance_report, format_pairwise_breakdown, format_settle_plan};
pub use expense::{
    format_expense_detail, format_expense_list, format_member_list, format_settlement_list,
};

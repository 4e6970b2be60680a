//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Month;

pub mod balance;
pub mod expense;
pub mod member;
pub mod settle;

pub use balance::{handle_balance_command, BalanceCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use member::{handle_member_command, MemberCommands};
pub use settle::{handle_settle_command, SettleCommands};

/// Parse a YYYY-MM-DD date argument, defaulting to today
pub(crate) fn parse_date(input: Option<&str>) -> LedgerResult<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD.", s))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse a YYYY-MM month argument, defaulting to the current month
pub(crate) fn parse_month(input: Option<&str>) -> LedgerResult<Month> {
    match input {
        Some(s) => s
            .parse::<Month>()
            .map_err(|e| LedgerError::Validation(e.to_string())),
        None => Ok(Month::current()),
    }
}

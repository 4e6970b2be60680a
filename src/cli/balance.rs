//! Balance CLI commands
//!
//! Implements the read-only ledger views: the group balance table, the
//! settle-up plan, and the pairwise breakdown between two members.

use clap::Subcommand;

use crate::display::{format_balance_report, format_pairwise_breakdown, format_settle_plan};
use crate::error::LedgerResult;
use crate::services::{BalanceService, MemberService};
use crate::storage::Storage;

use super::parse_month;

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Show net balances for the whole household
    Show {
        /// Restrict to a billing month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Suggest a minimal set of payments to settle the whole group
    Plan,
    /// Verify ledger health: the zero-sum rule and record consistency
    Check,
    /// Itemize the position between two members
    Between {
        /// The member whose view this is (name or ID)
        member: String,
        /// The other party (name or ID)
        other: String,
    },
}

/// Handle a balance command
pub fn handle_balance_command(storage: &Storage, cmd: BalanceCommands) -> LedgerResult<()> {
    let members = MemberService::new(storage);
    let service = BalanceService::new(storage);

    match cmd {
        BalanceCommands::Show { month } => {
            let member_list = members.list()?;
            let report = match month {
                Some(m) => service.report_for_month(parse_month(Some(&m))?)?,
                None => service.report()?,
            };
            print!("{}", format_balance_report(&report, &member_list));
        }

        BalanceCommands::Plan => {
            let member_list = members.list()?;
            let plan = service.settle_plan()?;
            print!("{}", format_settle_plan(&plan, &member_list));
        }

        BalanceCommands::Check => {
            let report = service.report()?;
            println!("Members:     {}", report.balances.len());
            println!("Balance sum: {}", report.sum_of_balances);
            if report.invariant_valid {
                println!("Ledger OK: balances sum to zero and all records are consistent.");
            } else {
                if !report.sum_of_balances.is_zero() {
                    println!("Problem: balances do not sum to zero.");
                }
                for inconsistency in &report.inconsistencies {
                    println!("Problem: {}", inconsistency);
                }
            }
        }

        BalanceCommands::Between { member, other } => {
            let a = members.require(&member)?;
            let b = members.require(&other)?;
            let member_list = members.list()?;

            let breakdown = service.pairwise(a.id, b.id)?;
            print!(
                "{}",
                format_pairwise_breakdown(&breakdown, &member_list, a.id, b.id)
            );
        }
    }

    Ok(())
}

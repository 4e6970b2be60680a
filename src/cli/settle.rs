//! Settlement CLI commands
//!
//! Implements CLI commands for recording settle-up payments between members.

use clap::Subcommand;

use crate::display::format_settlement_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, SettlementId};
use crate::services::{MemberService, SettlementService};
use crate::storage::Storage;

use super::{parse_date, parse_month};

/// Settlement subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Record a settlement payment
    ///
    /// The payment must not exceed what the payer directly owes the payee.
    Record {
        /// Member who paid (name or ID)
        from: String,
        /// Member who was paid (name or ID)
        to: String,
        /// Amount (e.g., "10.00")
        amount: String,
        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Note (e.g., "venmo")
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Check whether a settlement would be accepted, without recording it
    Check {
        /// Member who would pay (name or ID)
        from: String,
        /// Member who would be paid (name or ID)
        to: String,
        /// Amount (e.g., "10.00")
        amount: String,
    },
    /// List settlements
    List {
        /// Restrict to a billing month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// List the full history instead of one month
        #[arg(long)]
        all: bool,
    },
    /// Delete a settlement (undo a mistaken payment record)
    Remove {
        /// Settlement ID
        id: String,
    },
}

/// Resolve a settlement ID from a full UUID or the short `stl-xxxxxxxx` form
fn resolve_settlement_id(service: &SettlementService, input: &str) -> LedgerResult<SettlementId> {
    if let Ok(id) = input.parse::<SettlementId>() {
        return Ok(id);
    }

    let needle = input.strip_prefix("stl-").unwrap_or(input);
    let matches: Vec<SettlementId> = service
        .list()?
        .iter()
        .filter(|s| s.id.as_uuid().to_string().starts_with(needle))
        .map(|s| s.id)
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(LedgerError::settlement_not_found(input)),
        _ => Err(LedgerError::Validation(format!(
            "Ambiguous settlement ID '{}': matches {} settlements",
            input,
            matches.len()
        ))),
    }
}

fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '10.00'. Error: {}",
            input, e
        ))
    })
}

/// Handle a settlement command
pub fn handle_settle_command(storage: &Storage, cmd: SettleCommands) -> LedgerResult<()> {
    let members = MemberService::new(storage);
    let service = SettlementService::new(storage);

    match cmd {
        SettleCommands::Record {
            from,
            to,
            amount,
            date,
            note,
        } => {
            let from = members.require(&from)?;
            let to = members.require(&to)?;
            let amount = parse_amount(&amount)?;
            let date = parse_date(date.as_deref())?;

            let settlement = service.record(from.id, to.id, amount, date, note.as_deref())?;

            println!(
                "Recorded settlement: {} paid {} {}",
                from.name, to.name, settlement.amount
            );
            println!("  ID: {}", settlement.id);
        }

        SettleCommands::Check { from, to, amount } => {
            let from = members.require(&from)?;
            let to = members.require(&to)?;
            let amount = parse_amount(&amount)?;

            let check = service.check(from.id, to.id, amount)?;
            if check.valid {
                println!("OK: {} can pay {} {}.", from.name, to.name, amount);
                println!("  Currently owed: {}", check.pairwise_owed);
            } else {
                println!(
                    "Refused: {}",
                    check.error.unwrap_or_else(|| "invalid settlement".into())
                );
            }
        }

        SettleCommands::List { month, all } => {
            let member_list = members.list()?;
            let settlements = if all {
                service.list()?
            } else {
                let month = parse_month(month.as_deref())?;
                service.list_for_month(month)?
            };
            print!("{}", format_settlement_list(&settlements, &member_list));
        }

        SettleCommands::Remove { id } => {
            let id = resolve_settlement_id(&service, &id)?;
            let removed = service.delete(id)?;
            println!(
                "Deleted settlement of {} ({} -> {})",
                removed.amount, removed.from_member, removed.to_member
            );
        }
    }

    Ok(())
}

//! Expense CLI commands
//!
//! Implements CLI commands for recording and managing shared expenses.

use clap::Subcommand;

use crate::display::{format_expense_detail, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseId, MemberId, Money};
use crate::services::{ExpenseService, MemberService};
use crate::storage::Storage;

use super::{parse_date, parse_month};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// Member who paid (name or ID)
        payer: String,
        /// Amount (e.g., "25.99" or "26")
        amount: String,
        /// What the expense was for
        description: String,
        /// Participants splitting the expense (defaults to the whole household)
        #[arg(short = 'w', long = "with", value_delimiter = ',')]
        participants: Vec<String>,
        /// Integer split weights, parallel to the participants
        #[arg(long, value_delimiter = ',')]
        weights: Vec<u32>,
        /// Category (e.g., "Groceries")
        #[arg(short, long)]
        category: Option<String>,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List expenses
    List {
        /// Restrict to a billing month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Restrict to expenses paid by one member (name or ID)
        #[arg(short, long)]
        payer: Option<String>,
        /// List the full history instead of one month
        #[arg(long)]
        all: bool,
    },
    /// Show an expense with its split breakdown
    Show {
        /// Expense ID
        id: String,
    },
    /// Edit an expense's description, category, date, or amount
    Edit {
        /// Expense ID
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category (empty string clears it)
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New amount; existing splits are rescaled proportionally
        #[arg(short, long)]
        amount: Option<String>,
        /// Mark or unmark the expense as recurring (e.g., rent)
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Re-split an expense evenly across new participants
    Resplit {
        /// Expense ID
        id: String,
        /// Participants for the new even split
        #[arg(short = 'w', long = "with", value_delimiter = ',', required = true)]
        participants: Vec<String>,
    },
    /// Delete an expense
    Remove {
        /// Expense ID
        id: String,
    },
}

/// Resolve an expense ID from a full UUID or the short `exp-xxxxxxxx` form
fn resolve_expense_id(service: &ExpenseService, input: &str) -> LedgerResult<ExpenseId> {
    if let Ok(id) = input.parse::<ExpenseId>() {
        return Ok(id);
    }

    let needle = input.strip_prefix("exp-").unwrap_or(input);
    let matches: Vec<ExpenseId> = service
        .list()?
        .iter()
        .filter(|e| e.id.as_uuid().to_string().starts_with(needle))
        .map(|e| e.id)
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(LedgerError::expense_not_found(input)),
        _ => Err(LedgerError::Validation(format!(
            "Ambiguous expense ID '{}': matches {} expenses",
            input,
            matches.len()
        ))),
    }
}

fn parse_amount(input: &str) -> LedgerResult<Money> {
    let amount = Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '25.99' or '26'. Error: {}",
            input, e
        ))
    })?;

    if !amount.is_positive() {
        return Err(LedgerError::Validation(
            "Expense amount must be positive".into(),
        ));
    }

    Ok(amount)
}

/// Resolve participant identifiers, defaulting to the whole household.
fn resolve_participants(
    members: &MemberService,
    participants: &[String],
) -> LedgerResult<Vec<MemberId>> {
    if participants.is_empty() {
        let all = members.list()?;
        if all.is_empty() {
            return Err(LedgerError::Validation(
                "The household has no members yet. Add members first.".into(),
            ));
        }
        return Ok(all.into_iter().map(|m| m.id).collect());
    }

    participants
        .iter()
        .map(|p| members.require(p).map(|m| m.id))
        .collect()
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> LedgerResult<()> {
    let members = MemberService::new(storage);
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            payer,
            amount,
            description,
            participants,
            weights,
            category,
            date,
        } => {
            let payer = members.require(&payer)?;
            let amount = parse_amount(&amount)?;
            let date = parse_date(date.as_deref())?;
            let participant_ids = resolve_participants(&members, &participants)?;

            let expense = if weights.is_empty() {
                service.add_even(
                    payer.id,
                    amount,
                    &participant_ids,
                    date,
                    &description,
                    category.as_deref(),
                )?
            } else {
                if weights.len() != participant_ids.len() {
                    return Err(LedgerError::Validation(format!(
                        "Got {} weights for {} participants",
                        weights.len(),
                        participant_ids.len()
                    )));
                }
                let weighted: Vec<(MemberId, u32)> = participant_ids
                    .iter()
                    .copied()
                    .zip(weights.iter().copied())
                    .collect();
                service.add_weighted(
                    payer.id,
                    amount,
                    &weighted,
                    date,
                    &description,
                    category.as_deref(),
                )?
            };

            println!("Recorded expense: {}", expense.description);
            println!("  Paid by: {} ({})", payer.name, expense.amount);
            println!("  Split {} ways", expense.splits.len());
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { month, payer, all } => {
            let member_list = members.list()?;
            let payer = match payer {
                Some(p) => Some(members.require(&p)?),
                None => None,
            };
            let mut expenses = if all {
                match &payer {
                    Some(p) => service.list_for_payer(p.id)?,
                    None => service.list()?,
                }
            } else {
                let month = parse_month(month.as_deref())?;
                service.list_for_month(month)?
            };
            if let Some(p) = &payer {
                expenses.retain(|e| e.payer_id == p.id);
            }
            print!("{}", format_expense_list(&expenses, &member_list));
        }

        ExpenseCommands::Show { id } => {
            let id = resolve_expense_id(&service, &id)?;
            let expense = service
                .get(id)?
                .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
            let member_list = members.list()?;
            print!("{}", format_expense_detail(&expense, &member_list));
        }

        ExpenseCommands::Edit {
            id,
            description,
            category,
            date,
            amount,
            recurring,
        } => {
            if description.is_none()
                && category.is_none()
                && date.is_none()
                && amount.is_none()
                && recurring.is_none()
            {
                println!(
                    "No changes specified. Use --description, --category, --date, --amount, or --recurring."
                );
                return Ok(());
            }

            let id = resolve_expense_id(&service, &id)?;
            let date = match date {
                Some(d) => Some(parse_date(Some(&d))?),
                None => None,
            };
            let amount = match amount {
                Some(a) => Some(parse_amount(&a)?),
                None => None,
            };

            let updated = service.update(
                id,
                description.as_deref(),
                category.as_deref(),
                date,
                amount,
                recurring,
            )?;
            println!("Updated expense: {} ({})", updated.description, updated.amount);
        }

        ExpenseCommands::Resplit { id, participants } => {
            let id = resolve_expense_id(&service, &id)?;
            let participant_ids = resolve_participants(&members, &participants)?;

            let updated = service.resplit_even(id, &participant_ids)?;
            println!(
                "Re-split expense '{}' {} ways",
                updated.description,
                updated.splits.len()
            );
        }

        ExpenseCommands::Remove { id } => {
            let id = resolve_expense_id(&service, &id)?;
            let removed = service.delete(id)?;
            println!("Deleted expense: {}", removed.description);
        }
    }

    Ok(())
}

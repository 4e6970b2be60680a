//! Member CLI commands
//!
//! Implements CLI commands for household membership.

use clap::Subcommand;

use crate::display::format_member_list;
use crate::error::{LedgerError, LedgerResult};
use crate::services::MemberService;
use crate::storage::Storage;

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member to the household
    Add {
        /// Member name
        name: String,
    },
    /// List all members
    List,
    /// Rename a member
    Rename {
        /// Member name or ID
        member: String,
        /// New name
        name: String,
    },
    /// Remove a member from the household
    ///
    /// Refused while the member appears in any expense or settlement.
    Remove {
        /// Member name or ID
        member: String,
    },
}

/// Handle a member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> LedgerResult<()> {
    let service = MemberService::new(storage);

    match cmd {
        MemberCommands::Add { name } => {
            let member = service.add(&name)?;
            println!("Added member: {}", member.name);
            println!("  ID: {}", member.id);
        }

        MemberCommands::List => {
            let members = service.list()?;
            print!("{}", format_member_list(&members));
        }

        MemberCommands::Rename { member, name } => {
            let found = service.require(&member)?;
            let renamed = service.rename(found.id, &name)?;
            println!("Renamed member: {} -> {}", found.name, renamed.name);
        }

        MemberCommands::Remove { member } => {
            let found = service.require(&member)?;
            match service.remove(found.id) {
                Ok(removed) => println!("Removed member: {}", removed.name),
                Err(LedgerError::MemberHasHistory {
                    name,
                    expenses,
                    settlements,
                }) => {
                    println!(
                        "Cannot remove {}: referenced by {} expense(s) and {} settlement(s).",
                        name, expenses, settlements
                    );
                    println!("Delete or reassign those records first.");
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}

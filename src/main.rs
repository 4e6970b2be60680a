use anyhow::Result;
use clap::{Parser, Subcommand};

use roomledger::cli::{
    handle_balance_command, handle_expense_command, handle_member_command, handle_settle_command,
};
use roomledger::config::{paths::LedgerPaths, settings::Settings};
use roomledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "roomledger",
    version,
    about = "Shared-household expense ledger for the terminal",
    long_about = "roomledger tracks shared expenses for a household. Record who \
                  paid for what and how it splits, see who owes whom, and settle \
                  up with the minimum number of payments."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Member management commands
    #[command(subcommand)]
    Member(roomledger::cli::MemberCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(roomledger::cli::ExpenseCommands),

    /// Settlement commands
    #[command(subcommand)]
    Settle(roomledger::cli::SettleCommands),

    /// Balance views
    #[command(subcommand, alias = "bal")]
    Balance(roomledger::cli::BalanceCommands),

    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Member(cmd)) => {
            handle_member_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, cmd)?;
        }
        Some(Commands::Settle(cmd)) => {
            handle_settle_command(&storage, cmd)?;
        }
        Some(Commands::Balance(cmd)) => {
            handle_balance_command(&storage, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing roomledger at: {}", paths.base_dir().display());
            roomledger::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  roomledger member add <name>     Add household members");
            println!("  roomledger expense add ...       Record a shared expense");
            println!("  roomledger balance show          See who owes whom");
        }
        Some(Commands::Config) => {
            println!("roomledger Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Household name:  {}", settings.household_name);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
        }
        None => {
            println!("roomledger - Shared-household expense ledger");
            println!();
            println!("Run 'roomledger --help' for usage information.");
            println!("Run 'roomledger init' to set up a new ledger.");
        }
    }

    Ok(())
}

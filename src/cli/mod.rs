use std::fs::File;
use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, Receipt};
use crate::domain::{format_cents, parse_cents, Account, AccountId, Credential};
use crate::io::Exporter;
use crate::storage::AccountStore;

/// Teller - account ledger
#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "A role-aware account ledger tracking deposits and withdrawals")]
#[command(version)]
pub struct Cli {
    /// Store file path
    #[arg(short, long, default_value = "teller.json")]
    pub store: String,

    /// Acting user id (a customer's user id is their account id)
    #[arg(short, long, default_value_t = 1)]
    pub user: AccountId,

    /// Acting role: customer, banker
    #[arg(short, long, default_value = "customer")]
    pub role: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new store seeded with the demo accounts
    Init,

    /// Deposit into your own account
    Deposit {
        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,

        /// Description of the transaction
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Withdraw from your own account
    Withdraw {
        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,

        /// Description of the transaction
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show an account's balance (your own by default)
    Balance {
        /// Account id (bankers may target any account)
        account: Option<AccountId>,
    },

    /// List all accounts (bankers only)
    Accounts,

    /// Show an account's transaction history, newest first
    History {
        /// Account id (bankers may target any account)
        account: Option<AccountId>,

        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Verify that every balance matches its transaction history (bankers only)
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: accounts, history
        export_type: String,

        /// Account id for history export
        #[arg(long)]
        account: Option<AccountId>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let credential = Credential::from_parts(self.user, &self.role)
            .with_context(|| format!("Unknown role '{}'. Use customer or banker", self.role))?;

        match self.command {
            Commands::Init => {
                let store = demo_store()?;
                store.save(&self.store)?;
                println!("Store initialized with demo accounts: {}", self.store);
            }

            Commands::Deposit {
                amount,
                description,
            } => {
                let service = LedgerService::open(&self.store)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let receipt =
                    service.deposit(&credential, self.user, amount_cents, description)?;
                service.persist(&self.store)?;
                print_receipt("Deposited", &receipt);
            }

            Commands::Withdraw {
                amount,
                description,
            } => {
                let service = LedgerService::open(&self.store)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let receipt =
                    service.withdraw(&credential, self.user, amount_cents, description)?;
                service.persist(&self.store)?;
                print_receipt("Withdrew", &receipt);
            }

            Commands::Balance { account } => {
                let service = LedgerService::open(&self.store)?;
                let target = account.unwrap_or(self.user);
                let account = service.get_account(&credential, target)?;
                print_account(&account);
            }

            Commands::Accounts => {
                let service = LedgerService::open(&self.store)?;
                let accounts = service.list_accounts(&credential)?;

                println!("{:<6} {:<20} {:>14} {:>8}", "ID", "OWNER", "BALANCE", "TXNS");
                for account in accounts {
                    println!(
                        "{:<6} {:<20} {:>14} {:>8}",
                        account.id,
                        account.owner_name,
                        format_cents(account.balance_cents),
                        account.history_len
                    );
                }
            }

            Commands::History { account, limit } => {
                let service = LedgerService::open(&self.store)?;
                let target = account.unwrap_or(self.user);
                let history = service.get_history(&credential, target)?;

                println!(
                    "{:<6} {:<12} {:>12} {:>14}  {}",
                    "ID", "KIND", "AMOUNT", "BALANCE", "DESCRIPTION"
                );
                for tx in history.iter().take(limit.unwrap_or(usize::MAX)) {
                    println!(
                        "{:<6} {:<12} {:>12} {:>14}  {}",
                        tx.id,
                        tx.kind.as_str(),
                        format_cents(tx.amount_cents),
                        format_cents(tx.resulting_balance),
                        tx.description.as_deref().unwrap_or("-")
                    );
                }
            }

            Commands::Check => {
                let service = LedgerService::open(&self.store)?;
                let violations = service.verify_integrity(&credential)?;

                if violations.is_empty() {
                    println!("Ledger is consistent.");
                } else {
                    for (account_id, violation) in &violations {
                        println!("Account {}: {}", account_id, violation);
                    }
                    bail!("Found {} integrity violation(s)", violations.len());
                }
            }

            Commands::Export {
                export_type,
                account,
                output,
                format,
            } => {
                let service = LedgerService::open(&self.store)?;
                run_export_command(&service, &credential, &export_type, account, output, &format)?;
            }
        }

        Ok(())
    }
}

fn run_export_command(
    service: &LedgerService,
    credential: &Credential,
    export_type: &str,
    account: Option<AccountId>,
    output: Option<String>,
    format: &str,
) -> Result<()> {
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        ),
        None => Box::new(io::stdout()),
    };

    let exporter = Exporter::new(service, credential);
    let count = match (export_type, format) {
        ("accounts", "csv") => exporter.export_accounts_csv(&mut writer)?,
        ("accounts", "json") => exporter.export_accounts_json(&mut writer)?,
        ("history", "csv") => {
            let account = account.context("history export requires --account")?;
            exporter.export_history_csv(account, &mut writer)?
        }
        ("history", "json") => {
            let account = account.context("history export requires --account")?;
            exporter.export_history_json(account, &mut writer)?
        }
        (t, "csv" | "json") => bail!("Unknown export type '{}'. Use accounts or history", t),
        (_, f) => bail!("Unknown format '{}'. Use csv or json", f),
    };

    if let Some(path) = output {
        eprintln!("Exported {} record(s) to {}", count, path);
    }
    Ok(())
}

fn print_receipt(verb: &str, receipt: &Receipt) {
    println!(
        "{} {} ({}). New balance: {}",
        verb,
        format_cents(receipt.transaction.amount_cents),
        receipt
            .transaction
            .description
            .as_deref()
            .unwrap_or("no description"),
        format_cents(receipt.account.balance_cents)
    );
}

fn print_account(account: &Account) {
    println!("Account {} - {}", account.id, account.owner_name);
    println!("  Email:   {}", account.owner_email);
    println!("  Balance: {}", format_cents(account.balance_cents));
    println!("  History: {} transaction(s)", account.history.len());
}

/// Build the demo store: the two sample customers with their transaction
/// histories, replayed through the store so every invariant holds.
fn demo_store() -> Result<AccountStore> {
    use crate::domain::TransactionKind::{Deposit, Withdrawal};
    use chrono::Utc;

    let store = AccountStore::new();
    store.insert(Account::new(1, "John Doe", "customer@example.com", 0))?;
    store.insert(Account::new(3, "Bob Johnson", "customer2@example.com", 0))?;

    let seed = [
        (1, Deposit, 100000, "Initial deposit"),
        (1, Deposit, 250000, "Salary"),
        (1, Withdrawal, 50000, "ATM withdrawal"),
        (1, Deposit, 200000, "Bonus payment"),
        (3, Deposit, 150000, "Initial deposit"),
        (3, Withdrawal, 30000, "Online purchase"),
        (3, Deposit, 130000, "Freelance payment"),
    ];
    for (account_id, kind, amount, description) in seed {
        store.apply_transaction(
            account_id,
            kind,
            amount,
            Some(description.to_string()),
            Utc::now(),
        )?;
    }

    Ok(store)
}

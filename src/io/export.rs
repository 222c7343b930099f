use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{AccountId, AccountSummary, Credential, Transaction};

/// Ledger snapshot for full JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<AccountSummary>,
}

/// Exporter for converting ledger data to interchange formats. Reads go
/// through the service with the supplied credential, so export is subject to
/// exactly the same authorization as any other caller.
pub struct Exporter<'a> {
    service: &'a LedgerService,
    credential: &'a Credential,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService, credential: &'a Credential) -> Self {
        Self {
            service,
            credential,
        }
    }

    /// Export account summaries to CSV format
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts(self.credential)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "owner_name",
            "owner_email",
            "balance_cents",
            "history_len",
        ])?;

        let mut count = 0;
        for account in &accounts {
            csv_writer.write_record([
                account.id.to_string(),
                account.owner_name.clone(),
                account.owner_email.clone(),
                account.balance_cents.to_string(),
                account.history_len.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export one account's transaction history (newest first) to CSV format
    pub fn export_history_csv<W: Write>(&self, account_id: AccountId, writer: W) -> Result<usize> {
        let history = self.service.get_history(self.credential, account_id)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "account_id",
            "kind",
            "amount_cents",
            "resulting_balance",
            "timestamp",
            "description",
        ])?;

        let mut count = 0;
        for tx in &history {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.account_id.to_string(),
                tx.kind.as_str().to_string(),
                tx.amount_cents.to_string(),
                tx.resulting_balance.to_string(),
                tx.timestamp.to_rfc3339(),
                tx.description.clone().unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export one account's transaction history as JSON
    pub fn export_history_json<W: Write>(&self, account_id: AccountId, writer: W) -> Result<usize> {
        let history: Vec<Transaction> = self.service.get_history(self.credential, account_id)?;
        serde_json::to_writer_pretty(writer, &history)?;
        Ok(history.len())
    }

    /// Export all account summaries as a versioned JSON document
    pub fn export_accounts_json<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts(self.credential)?;
        let export = LedgerExport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts,
        };
        serde_json::to_writer_pretty(writer, &export)?;
        Ok(export.accounts.len())
    }
}

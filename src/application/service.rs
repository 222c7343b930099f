use std::path::Path;

use chrono::Utc;

use crate::domain::{
    verify_account, Account, AccountId, AccountSummary, Cents, Credential, IntegrityError,
    Transaction, TransactionKind,
};
use crate::storage::AccountStore;

use super::LedgerError;

/// Application service carrying the ledger's business rules: amount
/// validation, role-based authorization, and delegation to the store for the
/// atomic apply. This is the primary interface for any embedding (CLI, RPC
/// handler, TUI, etc.).
///
/// Holds no state of its own beyond the store it owns; every operation is
/// synchronous. Each request passes the same gates in order: validate the
/// amount, authorize the credential, apply against storage, return the
/// result, short-circuiting with a typed error at the first failed gate.
pub struct LedgerService {
    store: AccountStore,
}

/// Result of a successful deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The account as it stands after the mutation
    pub account: Account,
    /// The transaction recorded for it
    pub transaction: Transaction,
}

impl LedgerService {
    /// Create a ledger service over the given store.
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    /// Open a service backed by a snapshot file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let store = AccountStore::load(path).map_err(LedgerError::StorageUnavailable)?;
        Ok(Self::new(store))
    }

    /// Persist the current state to a snapshot file.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        self.store.save(path).map_err(LedgerError::StorageUnavailable)
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    // ========================
    // Mutations
    // ========================

    /// Deposit into the credential holder's own account.
    pub fn deposit(
        &self,
        credential: &Credential,
        account_id: AccountId,
        amount_cents: Cents,
        description: Option<String>,
    ) -> Result<Receipt, LedgerError> {
        self.apply(
            credential,
            account_id,
            TransactionKind::Deposit,
            amount_cents,
            description,
        )
    }

    /// Withdraw from the credential holder's own account. Fails with
    /// `InsufficientFunds` when the amount exceeds the balance; the check and
    /// the mutation are one atomic step inside the store, so concurrent
    /// withdrawals can never jointly overdraw an account.
    pub fn withdraw(
        &self,
        credential: &Credential,
        account_id: AccountId,
        amount_cents: Cents,
        description: Option<String>,
    ) -> Result<Receipt, LedgerError> {
        self.apply(
            credential,
            account_id,
            TransactionKind::Withdrawal,
            amount_cents,
            description,
        )
    }

    fn apply(
        &self,
        credential: &Credential,
        account_id: AccountId,
        kind: TransactionKind,
        amount_cents: Cents,
        description: Option<String>,
    ) -> Result<Receipt, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        if !credential.may_mutate(account_id) {
            return Err(LedgerError::Forbidden);
        }

        let (account, transaction) =
            self.store
                .apply_transaction(account_id, kind, amount_cents, description, Utc::now())?;

        Ok(Receipt {
            account,
            transaction,
        })
    }

    // ========================
    // Reads
    // ========================

    /// Fetch one account. Customers may fetch only their own; bankers any.
    pub fn get_account(
        &self,
        credential: &Credential,
        account_id: AccountId,
    ) -> Result<Account, LedgerError> {
        if !credential.may_read(account_id) {
            return Err(LedgerError::Forbidden);
        }
        Ok(self.store.get(account_id)?)
    }

    /// List all accounts as balance-level summaries. Bankers only.
    pub fn list_accounts(
        &self,
        credential: &Credential,
    ) -> Result<Vec<AccountSummary>, LedgerError> {
        if !credential.may_list_accounts() {
            return Err(LedgerError::Forbidden);
        }
        let accounts = self.store.list()?;
        Ok(accounts.iter().map(Account::summary).collect())
    }

    /// Fetch an account's transaction history, newest first. Same
    /// authorization rule as `get_account`. Storage stays insertion-ordered;
    /// the ordering is applied at read time.
    pub fn get_history(
        &self,
        credential: &Credential,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        if !credential.may_read(account_id) {
            return Err(LedgerError::Forbidden);
        }
        let account = self.store.get(account_id)?;
        let mut history = account.history;
        history.reverse();
        Ok(history)
    }

    // ========================
    // Integrity
    // ========================

    /// Re-verify every account's balance against the running sum of its
    /// history. Returns the violations found (empty means the ledger is
    /// consistent). Bankers only.
    pub fn verify_integrity(
        &self,
        credential: &Credential,
    ) -> Result<Vec<(AccountId, IntegrityError)>, LedgerError> {
        if !credential.may_list_accounts() {
            return Err(LedgerError::Forbidden);
        }

        let accounts = self.store.list()?;
        let violations = accounts
            .iter()
            .filter_map(|account| match verify_account(account) {
                Ok(()) => None,
                Err(err) => Some((account.id, err)),
            })
            .collect();
        Ok(violations)
    }
}

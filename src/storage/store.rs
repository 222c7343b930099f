use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Account, AccountId, Cents, Transaction, TransactionId, TransactionKind};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No account with id {0}")]
    NotFound(AccountId),

    #[error("Account already exists: {0}")]
    AlreadyExists(AccountId),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Cents, requested: Cents },

    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Cents),

    #[error("Balance overflow: balance {balance}, deposit {requested}")]
    BalanceOverflow { balance: Cents, requested: Cents },

    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

/// Keyed in-memory storage of accounts with atomic read-modify-write.
///
/// Each account sits behind its own `Mutex`, which is the per-account
/// exclusion scope: mutations on one account are serialized, mutations on
/// different accounts never contend. The outer `RwLock` guards only the
/// shape of the map (inserts), never an account's contents, so the mutation
/// hot path takes no global write lock.
pub struct AccountStore {
    accounts: RwLock<BTreeMap<AccountId, Arc<Mutex<Account>>>>,
    next_transaction_id: AtomicI64,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            next_transaction_id: AtomicI64::new(1),
        }
    }

    /// Build a store from existing accounts, e.g. a loaded snapshot.
    /// The transaction-id counter resumes after the highest id on record,
    /// so ids are never reused across a reload.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, StoreError> {
        let store = Self::new();
        let mut max_id: TransactionId = 0;
        for account in accounts {
            for tx in &account.history {
                max_id = max_id.max(tx.id);
            }
            store.insert(account)?;
        }
        store.next_transaction_id.store(max_id + 1, Ordering::Relaxed);
        Ok(store)
    }

    /// Register a new account. Used by the embedding at seed time; account
    /// creation is not part of the ledger's caller-facing contract.
    pub fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| anyhow!("account table lock poisoned"))?;

        if accounts.contains_key(&account.id) {
            return Err(StoreError::AlreadyExists(account.id));
        }
        accounts.insert(account.id, Arc::new(Mutex::new(account)));
        Ok(())
    }

    /// Fetch a consistent snapshot of one account (balance and history read
    /// under the same exclusion, so the last appended transaction always
    /// matches the balance).
    pub fn get(&self, account_id: AccountId) -> Result<Account, StoreError> {
        let entry = self.entry(account_id)?;
        let account = lock_account(&entry)?;
        Ok(account.clone())
    }

    /// Snapshot every account, in stable id order.
    pub fn list(&self) -> Result<Vec<Account>, StoreError> {
        let entries: Vec<Arc<Mutex<Account>>> = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| anyhow!("account table lock poisoned"))?;
            accounts.values().cloned().collect()
        };

        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(lock_account(&entry)?.clone());
        }
        Ok(out)
    }

    /// Apply one balance mutation as a single atomic unit: decide, build the
    /// transaction with its resulting balance, update the balance and append
    /// to history, all while holding the account's lock. On any failure the
    /// account is left exactly as it was.
    pub fn apply_transaction(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
        amount_cents: Cents,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Account, Transaction), StoreError> {
        if amount_cents <= 0 {
            return Err(StoreError::NonPositiveAmount(amount_cents));
        }

        let entry = self.entry(account_id)?;
        let mut account = lock_account(&entry)?;

        let new_balance = match kind {
            TransactionKind::Deposit => account
                .balance_cents
                .checked_add(amount_cents)
                .ok_or(StoreError::BalanceOverflow {
                    balance: account.balance_cents,
                    requested: amount_cents,
                })?,
            TransactionKind::Withdrawal => {
                if amount_cents > account.balance_cents {
                    return Err(StoreError::InsufficientFunds {
                        balance: account.balance_cents,
                        requested: amount_cents,
                    });
                }
                account.balance_cents - amount_cents
            }
        };

        // Keep timestamps non-decreasing within this account's history even
        // if the wall clock steps backwards between calls.
        let timestamp = match account.last_transaction() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let id = self.next_transaction_id.fetch_add(1, Ordering::Relaxed);
        let mut transaction =
            Transaction::new(id, account_id, kind, amount_cents, new_balance, timestamp);
        if let Some(description) = description {
            transaction = transaction.with_description(description);
        }

        account.balance_cents = new_balance;
        account.history.push(transaction.clone());

        Ok((account.clone(), transaction))
    }

    fn entry(&self, account_id: AccountId) -> Result<Arc<Mutex<Account>>, StoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| anyhow!("account table lock poisoned"))?;
        accounts
            .get(&account_id)
            .cloned()
            .ok_or(StoreError::NotFound(account_id))
    }
}

fn lock_account(entry: &Arc<Mutex<Account>>) -> Result<MutexGuard<'_, Account>, StoreError> {
    entry
        .lock()
        .map_err(|_| StoreError::Unavailable(anyhow!("account lock poisoned")))
}

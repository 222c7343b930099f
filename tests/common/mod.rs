// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use teller::application::LedgerService;
use teller::domain::{Account, AccountId, Cents, Credential};
use teller::storage::AccountStore;

/// Two-account fixture matching the demo data shape: account 1 starts at
/// 500.00 and account 2 at 2500.00.
pub fn test_service() -> LedgerService {
    let store = AccountStore::new();
    store
        .insert(Account::new(1, "John Doe", "customer@example.com", 50000))
        .unwrap();
    store
        .insert(Account::new(2, "Bob Johnson", "customer2@example.com", 250000))
        .unwrap();
    LedgerService::new(store)
}

/// Fixture with a single account holding the given opening balance.
pub fn single_account_service(balance: Cents) -> LedgerService {
    let store = AccountStore::new();
    store
        .insert(Account::new(1, "John Doe", "customer@example.com", balance))
        .unwrap();
    LedgerService::new(store)
}

pub fn customer(account_id: AccountId) -> Credential {
    Credential::Customer { account_id }
}

pub fn banker() -> Credential {
    Credential::Banker
}

use thiserror::Error;

use crate::domain::{AccountId, Cents};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Credential does not permit this operation")]
    Forbidden,

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Cents, requested: Cents },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] anyhow::Error),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LedgerError::AccountNotFound(id),
            StoreError::InsufficientFunds { balance, requested } => {
                LedgerError::InsufficientFunds { balance, requested }
            }
            StoreError::NonPositiveAmount(amount) => {
                LedgerError::InvalidAmount(format!("amount must be positive, got {amount} cents"))
            }
            StoreError::BalanceOverflow { balance, requested } => LedgerError::InvalidAmount(
                format!("deposit of {requested} cents overflows balance {balance}"),
            ),
            StoreError::AlreadyExists(id) => {
                LedgerError::StorageUnavailable(anyhow::anyhow!("duplicate account id {id}"))
            }
            StoreError::Unavailable(cause) => LedgerError::StorageUnavailable(cause),
        }
    }
}

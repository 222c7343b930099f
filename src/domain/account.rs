use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, Transaction};

pub type AccountId = i64;

/// A customer account: display metadata plus the balance and the ordered
/// transaction log that produced it.
///
/// Invariant: `balance_cents` always equals `opening_balance` plus the signed
/// sum of `history` (deposits positive, withdrawals negative). Every entry's
/// `resulting_balance` continues the chain from its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier, assigned at creation, never reused
    pub id: AccountId,
    pub owner_name: String,
    pub owner_email: String,
    /// Balance at account creation, before any recorded transaction
    pub opening_balance: Cents,
    /// Current balance; never negative
    pub balance_cents: Cents,
    /// Insertion-ordered, append-only transaction log
    pub history: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: AccountId,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
        opening_balance: Cents,
    ) -> Self {
        assert!(
            opening_balance >= 0,
            "Opening balance must be non-negative"
        );
        Self {
            id,
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            opening_balance,
            balance_cents: opening_balance,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The most recently applied transaction, if any.
    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.history.last()
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            owner_name: self.owner_name.clone(),
            owner_email: self.owner_email.clone(),
            balance_cents: self.balance_cents,
            history_len: self.history.len(),
        }
    }
}

/// The balance-level view of an account used for listings and interchange:
/// no transaction log, just its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub owner_name: String,
    pub owner_email: String,
    pub balance_cents: Cents,
    pub history_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_at_opening_balance() {
        let account = Account::new(1, "John Doe", "customer@example.com", 50000);
        assert_eq!(account.balance_cents, 50000);
        assert_eq!(account.opening_balance, 50000);
        assert!(account.history.is_empty());
        assert!(account.last_transaction().is_none());
    }

    #[test]
    fn test_summary_reflects_account() {
        let account = Account::new(3, "Bob Johnson", "customer2@example.com", 250000);
        let summary = account.summary();

        assert_eq!(summary.id, 3);
        assert_eq!(summary.owner_name, "Bob Johnson");
        assert_eq!(summary.balance_cents, 250000);
        assert_eq!(summary.history_len, 0);
    }

    #[test]
    #[should_panic(expected = "Opening balance must be non-negative")]
    fn test_negative_opening_balance_rejected() {
        Account::new(1, "x", "x@example.com", -1);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the account (balance increases)
    Deposit,
    /// Money leaving the account (balance decreases)
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }

    /// Apply the kind's sign to a positive amount: deposits count positive,
    /// withdrawals negative.
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            TransactionKind::Deposit => amount_cents,
            TransactionKind::Withdrawal => -amount_cents,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction is one recorded balance mutation on an account.
/// Transactions are immutable and append-only: created exactly once together
/// with the balance change they represent, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique, monotonically assigned, never reused
    pub id: TransactionId,
    /// Owning account
    pub account_id: AccountId,
    pub kind: TransactionKind,
    /// Amount in cents (always positive; the sign is derived from `kind`)
    pub amount_cents: Cents,
    /// Account balance immediately after this transaction was applied
    pub resulting_balance: Cents,
    /// When the transaction was recorded; non-decreasing within one account
    pub timestamp: DateTime<Utc>,
    /// Human-readable description
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction. Id and resulting balance are assigned by the
    /// store at apply time.
    pub fn new(
        id: TransactionId,
        account_id: AccountId,
        kind: TransactionKind,
        amount_cents: Cents,
        resulting_balance: Cents,
        timestamp: DateTime<Utc>,
    ) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            id,
            account_id,
            kind,
            amount_cents,
            resulting_balance,
            timestamp,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The signed effect of this transaction on the balance.
    pub fn signed_amount(&self) -> Cents {
        self.kind.signed(self.amount_cents)
    }
}

use super::{Account, Cents, Transaction};

/// Compute the balance implied by a transaction log.
/// Balance = opening balance + sum of deposits - sum of withdrawals
pub fn running_balance(opening_balance: Cents, history: &[Transaction]) -> Cents {
    history
        .iter()
        .fold(opening_balance, |balance, tx| balance + tx.signed_amount())
}

/// Verify an account's internal consistency: the stored balance must equal
/// the running sum of its history, and every entry's denormalized
/// `resulting_balance` must continue the chain from its predecessor with
/// strictly increasing ids and non-decreasing timestamps.
pub fn verify_account(account: &Account) -> Result<(), IntegrityError> {
    let mut balance = account.opening_balance;
    let mut previous: Option<&Transaction> = None;

    for tx in &account.history {
        if tx.account_id != account.id {
            return Err(IntegrityError::ForeignTransaction {
                transaction_id: tx.id,
                account_id: tx.account_id,
            });
        }
        if tx.amount_cents <= 0 {
            return Err(IntegrityError::NonPositiveAmount {
                transaction_id: tx.id,
                amount: tx.amount_cents,
            });
        }
        if let Some(prev) = previous {
            if tx.id <= prev.id {
                return Err(IntegrityError::IdsOutOfOrder {
                    transaction_id: tx.id,
                    previous_id: prev.id,
                });
            }
            if tx.timestamp < prev.timestamp {
                return Err(IntegrityError::TimestampsOutOfOrder {
                    transaction_id: tx.id,
                });
            }
        }

        balance += tx.signed_amount();
        if tx.resulting_balance != balance {
            return Err(IntegrityError::BrokenBalanceChain {
                transaction_id: tx.id,
                expected: balance,
                recorded: tx.resulting_balance,
            });
        }
        if tx.resulting_balance < 0 {
            return Err(IntegrityError::NegativeBalance {
                transaction_id: tx.id,
                balance: tx.resulting_balance,
            });
        }

        previous = Some(tx);
    }

    if account.balance_cents != balance {
        return Err(IntegrityError::BalanceMismatch {
            stored: account.balance_cents,
            computed: balance,
        });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    BalanceMismatch {
        stored: Cents,
        computed: Cents,
    },
    BrokenBalanceChain {
        transaction_id: i64,
        expected: Cents,
        recorded: Cents,
    },
    NegativeBalance {
        transaction_id: i64,
        balance: Cents,
    },
    NonPositiveAmount {
        transaction_id: i64,
        amount: Cents,
    },
    IdsOutOfOrder {
        transaction_id: i64,
        previous_id: i64,
    },
    TimestampsOutOfOrder {
        transaction_id: i64,
    },
    ForeignTransaction {
        transaction_id: i64,
        account_id: i64,
    },
}

impl std::fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityError::BalanceMismatch { stored, computed } => {
                write!(
                    f,
                    "Stored balance {} cents does not match history sum {} cents",
                    stored, computed
                )
            }
            IntegrityError::BrokenBalanceChain {
                transaction_id,
                expected,
                recorded,
            } => {
                write!(
                    f,
                    "Transaction {} records resulting balance {} cents, running sum gives {}",
                    transaction_id, recorded, expected
                )
            }
            IntegrityError::NegativeBalance {
                transaction_id,
                balance,
            } => {
                write!(
                    f,
                    "Transaction {} left a negative balance ({} cents)",
                    transaction_id, balance
                )
            }
            IntegrityError::NonPositiveAmount {
                transaction_id,
                amount,
            } => {
                write!(
                    f,
                    "Transaction {} has non-positive amount {} cents",
                    transaction_id, amount
                )
            }
            IntegrityError::IdsOutOfOrder {
                transaction_id,
                previous_id,
            } => {
                write!(
                    f,
                    "Transaction id {} follows {} in history",
                    transaction_id, previous_id
                )
            }
            IntegrityError::TimestampsOutOfOrder { transaction_id } => {
                write!(f, "Transaction {} is timestamped before its predecessor", transaction_id)
            }
            IntegrityError::ForeignTransaction {
                transaction_id,
                account_id,
            } => {
                write!(
                    f,
                    "Transaction {} belongs to account {} but sits in another account's history",
                    transaction_id, account_id
                )
            }
        }
    }
}

impl std::error::Error for IntegrityError {}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::TransactionKind;

    fn account_with(history: Vec<Transaction>) -> Account {
        let mut account = Account::new(1, "John Doe", "customer@example.com", 0);
        account.balance_cents = running_balance(0, &history);
        account.history = history;
        account
    }

    fn tx(id: i64, kind: TransactionKind, amount: Cents, resulting: Cents) -> Transaction {
        Transaction::new(id, 1, kind, amount, resulting, Utc::now())
    }

    #[test]
    fn test_running_balance_empty() {
        assert_eq!(running_balance(50000, &[]), 50000);
    }

    #[test]
    fn test_running_balance_mixed() {
        let history = vec![
            tx(1, TransactionKind::Deposit, 100000, 100000),
            tx(2, TransactionKind::Withdrawal, 25000, 75000),
            tx(3, TransactionKind::Deposit, 5000, 80000),
        ];
        assert_eq!(running_balance(0, &history), 80000);
    }

    #[test]
    fn test_verify_account_ok() {
        let account = account_with(vec![
            tx(1, TransactionKind::Deposit, 100000, 100000),
            tx(2, TransactionKind::Withdrawal, 50000, 50000),
        ]);
        assert!(verify_account(&account).is_ok());
    }

    #[test]
    fn test_verify_account_detects_balance_mismatch() {
        let mut account = account_with(vec![tx(1, TransactionKind::Deposit, 100000, 100000)]);
        account.balance_cents = 99999;

        assert!(matches!(
            verify_account(&account),
            Err(IntegrityError::BalanceMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_account_detects_broken_chain() {
        let account = account_with(vec![
            tx(1, TransactionKind::Deposit, 100000, 100000),
            tx(2, TransactionKind::Withdrawal, 50000, 60000), // wrong resulting balance
        ]);

        assert!(matches!(
            verify_account(&account),
            Err(IntegrityError::BrokenBalanceChain { .. })
        ));
    }

    #[test]
    fn test_verify_account_detects_id_disorder() {
        let account = account_with(vec![
            tx(5, TransactionKind::Deposit, 100000, 100000),
            tx(3, TransactionKind::Deposit, 100000, 200000),
        ]);

        assert!(matches!(
            verify_account(&account),
            Err(IntegrityError::IdsOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_verify_account_detects_foreign_transaction() {
        let mut account = account_with(vec![tx(1, TransactionKind::Deposit, 100000, 100000)]);
        account.history[0].account_id = 2;

        assert!(matches!(
            verify_account(&account),
            Err(IntegrityError::ForeignTransaction { .. })
        ));
    }
}

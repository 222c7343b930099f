use serde::{Deserialize, Serialize};

use super::AccountId;

/// Who is calling, as far as the ledger cares. Produced by the embedding's
/// session layer from its `(user id, role)` pair; the ledger only checks it.
///
/// A closed set of two variants, matched exhaustively at every authorization
/// gate, so adding a role without revisiting each gate fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Credential {
    /// An account owner, scoped to exactly one account
    Customer { account_id: AccountId },
    /// An auditor: may read any account, may mutate none
    Banker,
}

impl Credential {
    /// Build a credential from the raw `(user id, role)` pair the session
    /// layer hands over. A customer's user id is their account id.
    pub fn from_parts(user_id: AccountId, role: &str) -> Option<Self> {
        match role.to_lowercase().as_str() {
            "customer" => Some(Credential::Customer {
                account_id: user_id,
            }),
            "banker" => Some(Credential::Banker),
            _ => None,
        }
    }

    /// May this credential read the given account's balance and history?
    pub fn may_read(&self, target: AccountId) -> bool {
        match self {
            Credential::Customer { account_id } => *account_id == target,
            Credential::Banker => true,
        }
    }

    /// May this credential deposit into or withdraw from the given account?
    /// Only the owner may; bankers are read-only everywhere.
    pub fn may_mutate(&self, target: AccountId) -> bool {
        match self {
            Credential::Customer { account_id } => *account_id == target,
            Credential::Banker => false,
        }
    }

    /// May this credential enumerate all accounts?
    pub fn may_list_accounts(&self) -> bool {
        match self {
            Credential::Customer { .. } => false,
            Credential::Banker => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            Credential::from_parts(1, "customer"),
            Some(Credential::Customer { account_id: 1 })
        );
        assert_eq!(Credential::from_parts(2, "Banker"), Some(Credential::Banker));
        assert_eq!(Credential::from_parts(1, "admin"), None);
    }

    #[test]
    fn test_customer_scoped_to_own_account() {
        let credential = Credential::Customer { account_id: 1 };

        assert!(credential.may_read(1));
        assert!(credential.may_mutate(1));
        assert!(!credential.may_read(2));
        assert!(!credential.may_mutate(2));
        assert!(!credential.may_list_accounts());
    }

    #[test]
    fn test_banker_reads_everything_mutates_nothing() {
        let credential = Credential::Banker;

        assert!(credential.may_read(1));
        assert!(credential.may_read(42));
        assert!(credential.may_list_accounts());
        assert!(!credential.may_mutate(1));
        assert!(!credential.may_mutate(42));
    }
}

mod common;

use common::{banker, customer, test_service};
use teller::application::LedgerError;

#[test]
fn test_customer_cannot_touch_another_account() {
    let service = test_service();
    let credential = customer(1);

    assert!(matches!(
        service.deposit(&credential, 2, 100, None),
        Err(LedgerError::Forbidden)
    ));
    assert!(matches!(
        service.withdraw(&credential, 2, 100, None),
        Err(LedgerError::Forbidden)
    ));
    assert!(matches!(
        service.get_account(&credential, 2),
        Err(LedgerError::Forbidden)
    ));
    assert!(matches!(
        service.get_history(&credential, 2),
        Err(LedgerError::Forbidden)
    ));

    // Nothing was applied to the target account
    let other = service.get_account(&customer(2), 2).unwrap();
    assert_eq!(other.balance_cents, 250000);
    assert!(other.history.is_empty());
}

#[test]
fn test_customer_cross_account_is_forbidden_even_for_missing_accounts() {
    let service = test_service();

    // Authorization gates before storage: the caller learns nothing about
    // whether account 42 exists.
    assert!(matches!(
        service.get_account(&customer(1), 42),
        Err(LedgerError::Forbidden)
    ));
}

#[test]
fn test_banker_reads_any_account_but_mutates_none() {
    let service = test_service();
    let credential = banker();

    assert_eq!(service.get_account(&credential, 1).unwrap().id, 1);
    assert_eq!(service.get_account(&credential, 2).unwrap().id, 2);
    assert!(service.get_history(&credential, 1).unwrap().is_empty());

    for account_id in [1, 2] {
        assert!(matches!(
            service.deposit(&credential, account_id, 100, None),
            Err(LedgerError::Forbidden)
        ));
        assert!(matches!(
            service.withdraw(&credential, account_id, 100, None),
            Err(LedgerError::Forbidden)
        ));
    }
}

#[test]
fn test_only_bankers_list_accounts() {
    let service = test_service();

    let accounts = service.list_accounts(&banker()).unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, 1);
    assert_eq!(accounts[1].id, 2);
    assert_eq!(accounts[1].balance_cents, 250000);

    assert!(matches!(
        service.list_accounts(&customer(1)),
        Err(LedgerError::Forbidden)
    ));
}

#[test]
fn test_only_bankers_verify_integrity() {
    let service = test_service();

    assert!(service.verify_integrity(&banker()).is_ok());
    assert!(matches!(
        service.verify_integrity(&customer(1)),
        Err(LedgerError::Forbidden)
    ));
}

#[test]
fn test_customer_operates_on_own_account() {
    let service = test_service();
    let credential = customer(2);

    service.deposit(&credential, 2, 5000, None).unwrap();
    service.withdraw(&credential, 2, 1000, None).unwrap();

    let account = service.get_account(&credential, 2).unwrap();
    assert_eq!(account.balance_cents, 254000);
    assert_eq!(service.get_history(&credential, 2).unwrap().len(), 2);
}

mod common;

use common::{banker, customer, single_account_service};

#[test]
fn test_history_is_newest_first() {
    let service = single_account_service(0);
    let credential = customer(1);

    service
        .deposit(&credential, 1, 1000, Some("first".into()))
        .unwrap();
    service
        .deposit(&credential, 1, 2000, Some("second".into()))
        .unwrap();
    service
        .withdraw(&credential, 1, 500, Some("third".into()))
        .unwrap();

    let history = service.get_history(&credential, 1).unwrap();
    let descriptions: Vec<_> = history
        .iter()
        .map(|tx| tx.description.as_deref().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["third", "second", "first"]);
    assert_eq!(history[0].resulting_balance, 2500);
}

#[test]
fn test_ids_strictly_increase_in_creation_order() {
    let service = single_account_service(0);
    let credential = customer(1);

    for _ in 0..8 {
        service.deposit(&credential, 1, 100, None).unwrap();
    }

    // Stored order (oldest first) carries strictly increasing ids, so the
    // newest-first view is strictly decreasing.
    let history = service.get_history(&credential, 1).unwrap();
    assert_eq!(history.len(), 8);
    for pair in history.windows(2) {
        assert!(pair[0].id > pair[1].id);
    }
}

#[test]
fn test_timestamps_never_decrease_in_stored_order() {
    let service = single_account_service(0);
    let credential = customer(1);

    for _ in 0..5 {
        service.deposit(&credential, 1, 100, None).unwrap();
    }

    let account = service.get_account(&credential, 1).unwrap();
    for pair in account.history.windows(2) {
        assert!(pair[1].timestamp >= pair[0].timestamp);
    }
}

#[test]
fn test_history_read_does_not_change_stored_order() {
    let service = single_account_service(0);
    let credential = customer(1);

    service.deposit(&credential, 1, 100, None).unwrap();
    service.deposit(&credential, 1, 200, None).unwrap();

    // Reading newest-first twice leaves the underlying log untouched
    let _ = service.get_history(&credential, 1).unwrap();
    let _ = service.get_history(&credential, 1).unwrap();

    let account = service.get_account(&credential, 1).unwrap();
    assert_eq!(account.history[0].amount_cents, 100);
    assert_eq!(account.history[1].amount_cents, 200);
}

#[test]
fn test_banker_sees_same_history_as_owner() {
    let service = single_account_service(0);
    let credential = customer(1);

    service
        .deposit(&credential, 1, 4200, Some("Paycheck".into()))
        .unwrap();

    let own = service.get_history(&credential, 1).unwrap();
    let audited = service.get_history(&banker(), 1).unwrap();

    assert_eq!(own.len(), audited.len());
    assert_eq!(own[0].id, audited[0].id);
    assert_eq!(audited[0].description.as_deref(), Some("Paycheck"));
}

#[test]
fn test_empty_history() {
    let service = single_account_service(50000);
    let history = service.get_history(&customer(1), 1).unwrap();
    assert!(history.is_empty());
}

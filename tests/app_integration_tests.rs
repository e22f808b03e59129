mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use fintrack::auth::{hash_password, verify_password};
use fintrack::FinError;
use fintrack_domain::{Budget, Category, PaymentMethod, Transaction, TransactionPatch};

use common::{memory_app, open_json_app, temp_home};

fn jan(day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn json_sessions_persist_across_reopen() {
    let home = temp_home();
    let expense_id = {
        let mut app = open_json_app(&home);
        let id = app
            .add_transaction(
                Transaction::expense(42.0, Category::Food, jan(5))
                    .with_payment_method(PaymentMethod::Cash),
            )
            .unwrap();
        app.add_transaction(Transaction::income(1000.0, Category::Income, jan(1)))
            .unwrap();
        app.add_budget(Budget::for_month(Category::Food, 200.0, date(2024, 1, 1)))
            .unwrap();
        app.set_setting("currency", "€").unwrap();
        app.flush().unwrap();
        id
    };

    let app = open_json_app(&home);
    assert_eq!(app.transactions().len(), 2);
    assert_eq!(app.budgets().all().len(), 1);
    assert_eq!(app.settings().currency, "€");
    assert_eq!(app.total_balance(), 958.0);
    let stored = app.transactions().get(expense_id).unwrap();
    assert_eq!(stored.payment_method, Some(PaymentMethod::Cash));
}

#[test]
fn budget_tracks_edits_to_transactions() {
    let mut app = memory_app();
    let budget_id = app
        .add_budget(Budget::for_month(Category::Food, 100.0, date(2024, 1, 1)))
        .unwrap();
    let txn = app
        .add_transaction(Transaction::expense(50.0, Category::Food, jan(5)))
        .unwrap();
    assert_eq!(app.budget_status(budget_id).unwrap().percentage, 50.0);

    let patch = TransactionPatch {
        amount: Some(80.0),
        ..TransactionPatch::default()
    };
    app.update_transaction(txn, patch).unwrap();
    let status = app.budget_status(budget_id).unwrap();
    assert_eq!(status.spent, 80.0);
    assert_eq!(status.remaining, 20.0);

    app.remove_transaction(txn).unwrap();
    assert_eq!(app.budget_status(budget_id).unwrap().spent, 0.0);
}

#[test]
fn export_then_import_restores_state_in_a_new_session() {
    let mut source = memory_app();
    source
        .add_transaction(Transaction::expense(12.5, Category::Transport, jan(3)).with_description("bus"))
        .unwrap();
    source
        .add_budget(Budget::for_month(Category::Transport, 60.0, date(2024, 1, 1)))
        .unwrap();
    source.set_setting("dark_mode", "on").unwrap();
    let json = source.export_snapshot().unwrap();

    let mut target = open_json_app(&temp_home());
    target
        .add_transaction(Transaction::expense(1.0, Category::Other, jan(2)))
        .unwrap();
    target.import_snapshot(&json).unwrap();

    assert_eq!(target.transactions().as_slice(), source.transactions().as_slice());
    assert_eq!(target.budgets().all(), source.budgets().all());
    assert_eq!(target.settings(), source.settings());
}

#[test]
fn invalid_import_leaves_data_untouched() {
    let mut app = memory_app();
    app.add_transaction(Transaction::expense(5.0, Category::Food, jan(4)))
        .unwrap();

    assert!(app.import_snapshot("{ not json").is_err());
    let bad_budget = r#"{"schemaVersion":1,"transactions":[],"budgets":[{
        "id":"6f1c2a8e-3b7d-4c55-9a0e-1d2b3c4d5e6f","category":"food","amount":10,
        "startDate":"2024-02-01","endDate":"2024-01-01"}]}"#;
    assert!(app.import_snapshot(bad_budget).is_err());
    assert_eq!(app.transactions().len(), 1);
}

#[test]
fn sync_payload_replaces_local_data() {
    let mut remote = memory_app();
    remote
        .add_transaction(Transaction::income(300.0, Category::Income, jan(10)))
        .unwrap();
    let payload = remote.export_snapshot().unwrap();

    let mut local = memory_app();
    local
        .add_transaction(Transaction::expense(20.0, Category::Food, jan(11)))
        .unwrap();
    local.apply_sync_payload(&payload).unwrap();
    assert_eq!(local.total_balance(), 300.0);
}

#[test]
fn backups_round_trip_through_restore() {
    let home = temp_home();
    let mut app = open_json_app(&home);
    app.add_transaction(Transaction::expense(9.0, Category::Food, jan(6)))
        .unwrap();
    let backup = app.backup(Some("before reset")).unwrap();
    assert!(backup.name.starts_with("snapshot_"));
    assert!(backup.name.ends_with("before-reset"));

    app.reset().unwrap();
    assert!(app.transactions().is_empty());

    let listed = app.list_backups().unwrap();
    assert_eq!(listed.len(), 1);
    app.restore_backup(&backup.name).unwrap();
    assert_eq!(app.transactions().len(), 1);
}

#[test]
fn overlapping_budget_is_rejected_through_the_app() {
    let mut app = memory_app();
    app.add_budget(Budget::for_month(Category::Food, 100.0, date(2024, 1, 1)))
        .unwrap();
    let overlapping = Budget::new(Category::Food, 50.0, date(2024, 1, 15), date(2024, 2, 15));
    assert!(matches!(app.add_budget(overlapping), Err(FinError::Core(_))));
    assert_eq!(app.budgets().all().len(), 1);
}

#[test]
fn password_helpers_hash_and_verify() {
    let hash = hash_password("s3cret").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("s3cret", &hash).unwrap());
    assert!(!verify_password("guess", &hash).unwrap());
}

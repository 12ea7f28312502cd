#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Category, TxnType};

fn new_txn(txn_type: TxnType, category: Category, amount: Decimal, date: &str) -> NewTransaction {
    NewTransaction {
        txn_type,
        category,
        description: None,
        amount,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
    }
}

fn empty_store() -> LocalStore {
    LocalStore::load(Database::open_in_memory().unwrap())
}

#[test]
fn test_load_empty_database() {
    let store = empty_store();
    assert!(store.transactions().is_empty());
    assert_eq!(store.totals().balance, Decimal::ZERO);
}

#[test]
fn test_load_malformed_payload_is_empty() {
    let db = Database::open_in_memory().unwrap();
    db.set(schema::KEY_LEDGER, "{not json").unwrap();
    let store = LocalStore::load(db);
    assert!(store.transactions().is_empty());
}

#[test]
fn test_load_wrong_shape_is_empty() {
    let db = Database::open_in_memory().unwrap();
    db.set(schema::KEY_LEDGER, r#"[{"id": "x", "amount": []}]"#)
        .unwrap();
    let store = LocalStore::load(db);
    assert!(store.transactions().is_empty());
}

#[test]
fn test_add_inserts_newest_first() {
    let mut store = empty_store();
    let fuel = store
        .add_at(
            new_txn(TxnType::Expense, Category::Fuel, dec!(50.00), "2024-01-10"),
            1_000,
        )
        .unwrap();
    let ride = store
        .add_at(
            new_txn(TxnType::Income, Category::Ride, dec!(120.00), "2024-01-11"),
            2_000,
        )
        .unwrap();

    let ids: Vec<i64> = store.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![ride.id, fuel.id]);
}

#[test]
fn test_order_is_insertion_not_date() {
    let mut store = empty_store();
    store
        .add_at(
            new_txn(TxnType::Income, Category::Ride, dec!(1), "2024-03-01"),
            1,
        )
        .unwrap();
    let older = store
        .add_at(
            new_txn(TxnType::Income, Category::Ride, dec!(2), "2023-01-01"),
            2,
        )
        .unwrap();
    assert_eq!(store.transactions()[0].id, older.id);
}

#[test]
fn test_ids_unique_when_clock_collides() {
    let mut store = empty_store();
    let a = store
        .add_at(new_txn(TxnType::Income, Category::Ride, dec!(1), "2024-01-01"), 500)
        .unwrap();
    let b = store
        .add_at(new_txn(TxnType::Income, Category::Ride, dec!(1), "2024-01-01"), 500)
        .unwrap();
    let c = store
        .add_at(new_txn(TxnType::Income, Category::Ride, dec!(1), "2024-01-01"), 400)
        .unwrap();
    assert_eq!(a.id, 500);
    assert_eq!(b.id, 501);
    assert_eq!(c.id, 502);
}

#[test]
fn test_add_uses_wall_clock_id() {
    let mut store = empty_store();
    let before = chrono::Utc::now().timestamp_millis();
    let txn = store
        .add(new_txn(TxnType::Expense, Category::Food, dec!(9.90), "2024-01-01"))
        .unwrap();
    assert!(txn.id >= before);
}

#[test]
fn test_scenario_totals() {
    let mut store = empty_store();
    store
        .add_at(
            new_txn(TxnType::Expense, Category::Fuel, dec!(50.00), "2024-01-10"),
            1,
        )
        .unwrap();
    store
        .add_at(
            new_txn(TxnType::Income, Category::Ride, dec!(120.00), "2024-01-11"),
            2,
        )
        .unwrap();
    let totals = store.totals();
    assert_eq!(totals.income, dec!(120.00));
    assert_eq!(totals.expense, dec!(50.00));
    assert_eq!(totals.balance, dec!(70.00));
}

#[test]
fn test_remove_twice_is_noop() {
    let mut store = empty_store();
    let txn = store
        .add_at(new_txn(TxnType::Expense, Category::Parking, dec!(8), "2024-01-01"), 10)
        .unwrap();
    assert!(store.remove(txn.id).unwrap());
    assert!(!store.remove(txn.id).unwrap());
    assert!(store.transactions().is_empty());
}

#[test]
fn test_remove_unknown_id() {
    let mut store = empty_store();
    store
        .add_at(new_txn(TxnType::Expense, Category::Parking, dec!(8), "2024-01-01"), 10)
        .unwrap();
    assert!(!store.remove(99).unwrap());
    assert_eq!(store.transactions().len(), 1);
}

#[test]
fn test_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let mut submitted = new_txn(TxnType::Expense, Category::CarWash, dec!(25.50), "2024-02-03");
    submitted.description = Some("Full wash".into());

    let stored = {
        let mut store = LocalStore::load(Database::open(&path).unwrap());
        store.add(submitted.clone()).unwrap()
    };

    let store = LocalStore::load(Database::open(&path).unwrap());
    let loaded = store.get(stored.id).unwrap();
    assert_eq!(loaded.to_new(), submitted);
}

#[test]
fn test_remove_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let mut store = LocalStore::load(Database::open(&path).unwrap());
        let keep = store
            .add_at(new_txn(TxnType::Income, Category::Ride, dec!(30), "2024-01-01"), 1)
            .unwrap();
        let gone = store
            .add_at(new_txn(TxnType::Expense, Category::Food, dec!(12), "2024-01-01"), 2)
            .unwrap();
        store.remove(gone.id).unwrap();
        assert_eq!(store.transactions()[0].id, keep.id);
    }
    let store = LocalStore::load(Database::open(&path).unwrap());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.transactions()[0].id, 1);
}

#[test]
fn test_replace_is_not_persisted_until_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let remote = vec![new_txn(TxnType::Income, Category::Ride, dec!(40), "2024-01-05").with_id(7)];
    {
        let mut store = LocalStore::load(Database::open(&path).unwrap());
        store.replace(remote.clone());
        assert_eq!(store.transactions(), remote.as_slice());
    }
    {
        let mut store = LocalStore::load(Database::open(&path).unwrap());
        assert!(store.transactions().is_empty());
        store.replace(remote);
        store
            .add_at(new_txn(TxnType::Expense, Category::Fuel, dec!(5), "2024-01-06"), 100)
            .unwrap();
    }
    let store = LocalStore::load(Database::open(&path).unwrap());
    let ids: Vec<i64> = store.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![100, 7]);
}

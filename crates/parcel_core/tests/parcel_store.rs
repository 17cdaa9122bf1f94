use parcel_core::db::{open_db, open_db_in_memory, DbError};
use parcel_core::{
    ClientId, InMemoryParcelStore, Parcel, ParcelStore, RepoError, SqliteParcelStore,
    STATUS_DELIVERED, STATUS_REGISTERED, STATUS_SENT,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use std::collections::HashMap;
use std::error::Error;

fn test_parcel() -> Parcel {
    Parcel {
        number: 0,
        client: 1000,
        status: STATUS_REGISTERED.to_string(),
        address: "test".to_string(),
        created_at: "2024-03-01T10:15:00Z".to_string(),
    }
}

fn random_client(rng: &mut StdRng) -> ClientId {
    rng.random_range(1..10_000_000)
}

fn add_get_delete(store: &impl ParcelStore) {
    let mut parcel = test_parcel();

    let number = store.add(&parcel).unwrap();
    assert!(number > 0);
    parcel.number = number;

    assert_eq!(store.get(number).unwrap(), parcel);

    store.delete(number).unwrap();
    let err = store.get(number).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == number));
}

fn set_address_while_registered(store: &impl ParcelStore) {
    let number = store.add(&test_parcel()).unwrap();

    store.set_address(number, "new test address").unwrap();

    assert_eq!(store.get(number).unwrap().address, "new test address");
}

fn set_status_overwrites(store: &impl ParcelStore) {
    let number = store.add(&test_parcel()).unwrap();

    store.set_status(number, STATUS_DELIVERED).unwrap();

    assert_eq!(store.get(number).unwrap().status, STATUS_DELIVERED);
}

fn guard_blocks_after_status_change(store: &impl ParcelStore) {
    let mut parcel = test_parcel();
    let number = store.add(&parcel).unwrap();
    parcel.number = number;
    assert_eq!(store.get(number).unwrap(), parcel);

    store.set_status(number, STATUS_DELIVERED).unwrap();
    parcel.status = STATUS_DELIVERED.to_string();
    assert_eq!(store.get(number).unwrap(), parcel);

    store.set_address(number, "new address").unwrap();
    assert_eq!(store.get(number).unwrap(), parcel);

    store.delete(number).unwrap();
    assert_eq!(store.get(number).unwrap(), parcel);
}

fn get_by_client_returns_exact_set(store: &impl ParcelStore) {
    let mut rng = StdRng::from_os_rng();
    let client = random_client(&mut rng);
    let other_client = loop {
        let candidate = random_client(&mut rng);
        if candidate != client {
            break candidate;
        }
    };

    let mut expected = HashMap::new();
    for (index, owner) in [client, other_client, client, other_client, client]
        .into_iter()
        .enumerate()
    {
        let mut parcel = test_parcel();
        parcel.client = owner;
        parcel.address = format!("address {index}");
        parcel.number = store.add(&parcel).unwrap();
        if owner == client {
            expected.insert(parcel.number, parcel);
        }
    }

    let stored = store.get_by_client(client).unwrap();
    assert_eq!(stored.len(), expected.len());
    for parcel in stored {
        assert_eq!(expected.get(&parcel.number), Some(&parcel));
    }
}

fn missing_rows_are_silent(store: &impl ParcelStore) {
    let unknown = 987_654;

    assert!(store.get(unknown).unwrap_err().is_not_found());
    assert!(store.get_by_client(unknown).unwrap().is_empty());
    store.set_status(unknown, STATUS_SENT).unwrap();
    store.set_address(unknown, "nowhere").unwrap();
    store.delete(unknown).unwrap();
    assert!(store.get(unknown).unwrap_err().is_not_found());
}

#[test]
fn sqlite_add_get_delete() {
    let conn = open_db_in_memory().unwrap();
    add_get_delete(&SqliteParcelStore::new(&conn));
}

#[test]
fn sqlite_set_address_while_registered() {
    let conn = open_db_in_memory().unwrap();
    set_address_while_registered(&SqliteParcelStore::new(&conn));
}

#[test]
fn sqlite_set_status_overwrites() {
    let conn = open_db_in_memory().unwrap();
    set_status_overwrites(&SqliteParcelStore::new(&conn));
}

#[test]
fn sqlite_guard_blocks_after_status_change() {
    let conn = open_db_in_memory().unwrap();
    guard_blocks_after_status_change(&SqliteParcelStore::new(&conn));
}

#[test]
fn sqlite_get_by_client_returns_exact_set() {
    let conn = open_db_in_memory().unwrap();
    get_by_client_returns_exact_set(&SqliteParcelStore::new(&conn));
}

#[test]
fn sqlite_missing_rows_are_silent() {
    let conn = open_db_in_memory().unwrap();
    missing_rows_are_silent(&SqliteParcelStore::new(&conn));
}

#[test]
fn memory_add_get_delete() {
    add_get_delete(&InMemoryParcelStore::new());
}

#[test]
fn memory_set_address_while_registered() {
    set_address_while_registered(&InMemoryParcelStore::new());
}

#[test]
fn memory_set_status_overwrites() {
    set_status_overwrites(&InMemoryParcelStore::new());
}

#[test]
fn memory_guard_blocks_after_status_change() {
    guard_blocks_after_status_change(&InMemoryParcelStore::new());
}

#[test]
fn memory_get_by_client_returns_exact_set() {
    get_by_client_returns_exact_set(&InMemoryParcelStore::new());
}

#[test]
fn memory_missing_rows_are_silent() {
    missing_rows_are_silent(&InMemoryParcelStore::new());
}

#[test]
fn sqlite_store_ignores_caller_number() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::new(&conn);

    let mut parcel = test_parcel();
    parcel.number = 500;
    let first = store.add(&parcel).unwrap();
    let second = store.add(&parcel).unwrap();

    assert_ne!(first, 500);
    assert!(second > first);
}

#[test]
fn sqlite_store_accepts_externally_prepared_connection() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE parcel (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            client INTEGER NOT NULL,
            status TEXT NOT NULL,
            address TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
    .unwrap();
    let store = SqliteParcelStore::new(&conn);

    let number = store.add(&test_parcel()).unwrap();
    assert_eq!(store.get(number).unwrap().address, "test");
}

#[test]
fn sqlite_storage_failure_is_surfaced_with_driver_source() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE parcel;").unwrap();
    let store = SqliteParcelStore::new(&conn);

    let err = store.add(&test_parcel()).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    assert!(!err.is_not_found());
    assert!(err.source().is_some());

    let err = store.get(1).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    let err = store.get_by_client(1000).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn sqlite_write_failures_are_not_mistaken_for_guard_misses() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::new(&conn);
    let number = store.add(&test_parcel()).unwrap();
    conn.execute_batch("DROP TABLE parcel;").unwrap();

    let err = store.set_status(number, STATUS_DELIVERED).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    let err = store.set_address(number, "new address").unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    let err = store.delete(number).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
}

#[test]
fn sqlite_rows_survive_reopen_of_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.db");
    let mut rng = StdRng::from_os_rng();
    let client = random_client(&mut rng);

    let mut parcel = test_parcel();
    parcel.client = client;
    {
        let conn = open_db(&path).unwrap();
        parcel.number = SqliteParcelStore::new(&conn).add(&parcel).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteParcelStore::new(&conn);
    assert_eq!(store.get_by_client(client).unwrap(), vec![parcel]);
}

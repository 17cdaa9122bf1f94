//! In-process parcel store.
//!
//! Mirrors `SqliteParcelStore` semantics without a database, for callers
//! and tests that only need the `ParcelStore` contract.
//!
//! # Invariants
//! - Numbers start at 1 and are never reused, even after deletion.
//! - The `registered` guard matches the SQLite implementation.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, STATUS_REGISTERED};
use crate::repo::parcel_repo::{ParcelStore, RepoError, RepoResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// `ParcelStore` backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryParcelStore {
    rows: RefCell<BTreeMap<ParcelNumber, Parcel>>,
    last_number: Cell<ParcelNumber>,
}

impl InMemoryParcelStore {
    /// Creates an empty store whose first assigned number is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored parcels.
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Returns whether no parcels are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }
}

impl ParcelStore for InMemoryParcelStore {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        let number = self.last_number.get() + 1;
        self.last_number.set(number);

        let mut row = parcel.clone();
        row.number = number;
        self.rows.borrow_mut().insert(number, row);
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.rows
            .borrow()
            .get(&number)
            .cloned()
            .ok_or(RepoError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        Ok(self
            .rows
            .borrow()
            .values()
            .filter(|parcel| parcel.client == client)
            .cloned()
            .collect())
    }

    fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()> {
        if let Some(parcel) = self.rows.borrow_mut().get_mut(&number) {
            parcel.status = status.to_string();
        }
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        if let Some(parcel) = self.rows.borrow_mut().get_mut(&number) {
            if parcel.status == STATUS_REGISTERED {
                parcel.address = address.to_string();
            }
        }
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        let mut rows = self.rows.borrow_mut();
        if rows
            .get(&number)
            .is_some_and(|parcel| parcel.status == STATUS_REGISTERED)
        {
            rows.remove(&number);
        }
        Ok(())
    }
}

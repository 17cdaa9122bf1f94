//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide tracking use-cases (register, list, advance, re-address,
//!   cancel) on top of any `ParcelStore`.
//! - Interpret status strings; the store itself treats them as opaque.
//!
//! # Invariants
//! - Service APIs never bypass the store's `registered` guard.
//! - Service layer remains storage-agnostic.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelStore, RepoError, RepoResult};
use log::info;

/// Use-case service wrapper for parcel tracking.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a new parcel for `client` and returns it with its number.
    ///
    /// # Contract
    /// - Status is `registered`.
    /// - `created_at` is the current UTC time in RFC3339.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.store.add(&parcel)?;

        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Lists every parcel owned by `client`. Order is unspecified.
    pub fn client_parcels(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.store.get_by_client(client)
    }

    /// Moves the parcel one step along `registered -> sent -> delivered`.
    ///
    /// Returns the new status, or `None` when the parcel was already
    /// delivered and nothing changed.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when the parcel does not exist.
    /// - `RepoError::InvalidData` when the stored status is unknown.
    pub fn next_status(&self, number: ParcelNumber) -> RepoResult<Option<String>> {
        let parcel = self.store.get(number)?;
        let current = ParcelStatus::parse(&parcel.status).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "unknown status `{}` on parcel {number}",
                parcel.status
            ))
        })?;

        let Some(next) = current.next() else {
            return Ok(None);
        };

        self.store.set_status(number, next.as_str())?;
        info!(
            "event=parcel_next_status module=service status=ok number={} from={} to={}",
            number,
            current.as_str(),
            next.as_str()
        );
        Ok(Some(next.as_str().to_string()))
    }

    /// Changes the delivery address. A non-`registered` parcel is left
    /// untouched and the call still succeeds.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.store.set_address(number, address)
    }

    /// Cancels a parcel. A non-`registered` parcel is kept and the call
    /// still succeeds.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.store.delete(number)
    }
}

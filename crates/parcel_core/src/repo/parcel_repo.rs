//! Parcel store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the six parcel data-access operations over the `parcel` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `number` is assigned by SQLite on insert, never taken from the caller.
//! - Address changes and deletion only touch rows with
//!   `status = 'registered'`; a guarded miss affects zero rows and is
//!   reported as success.
//! - `set_status` on a missing row is reported as success.
//! - Only `get` reports `NotFound`.

use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber, STATUS_REGISTERED};
use log::{debug, error};
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by parcel store and service operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage failure, carrying the driver error unchanged.
    Db(DbError),
    /// `get` found no row with this number.
    NotFound(ParcelNumber),
    /// Persisted state the caller cannot interpret.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether this error means the parcel does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidData(message) => write!(f, "invalid parcel data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for parcels.
///
/// Implementations must not validate `status` values; the only business
/// rule they enforce is the `registered` guard on `set_address`/`delete`.
pub trait ParcelStore {
    /// Inserts a new row and returns its assigned number.
    /// `parcel.number` is ignored.
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel. Missing rows yield `RepoError::NotFound`.
    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Loads every parcel owned by `client`, in no particular order.
    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites the status unconditionally.
    fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()>;
    /// Overwrites the address only while the parcel is `registered`.
    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Removes the parcel only while it is `registered`.
    fn delete(&self, number: ParcelNumber) -> RepoResult<()>;
}

/// SQLite-backed parcel store borrowing a caller-owned connection.
pub struct SqliteParcelStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelStore<'conn> {
    /// Wraps an already opened connection. The store never closes it.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ParcelStore for SqliteParcelStore<'_> {
    fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn
            .execute(
                "INSERT INTO parcel (client, status, address, created_at)
                 VALUES (:client, :status, :address, :created_at);",
                named_params! {
                    ":client": parcel.client,
                    ":status": parcel.status.as_str(),
                    ":address": parcel.address.as_str(),
                    ":created_at": parcel.created_at.as_str(),
                },
            )
            .map_err(|err| storage_error("parcel_add", err))?;

        let number = self.conn.last_insert_rowid();
        debug!(
            "event=parcel_add module=repo status=ok number={} client={}",
            number, parcel.client
        );
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.conn
            .query_row(
                &format!("{PARCEL_SELECT_SQL} WHERE number = :number;"),
                named_params! { ":number": number },
                parse_parcel_row,
            )
            .optional()
            .map_err(|err| storage_error("parcel_get", err))?
            .ok_or(RepoError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let query = || -> rusqlite::Result<Vec<Parcel>> {
            let mut stmt = self
                .conn
                .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = :client;"))?;
            let rows = stmt.query_map(named_params! { ":client": client }, parse_parcel_row)?;
            rows.collect()
        };

        query().map_err(|err| storage_error("parcel_get_by_client", err))
    }

    fn set_status(&self, number: ParcelNumber, status: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE parcel SET status = :status WHERE number = :number;",
                named_params! { ":status": status, ":number": number },
            )
            .map_err(|err| storage_error("parcel_set_status", err))?;

        debug!(
            "event=parcel_set_status module=repo status=ok number={} changed={}",
            number, changed
        );
        Ok(())
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE parcel
                 SET address = :address
                 WHERE number = :number
                   AND status = :registered;",
                named_params! {
                    ":address": address,
                    ":number": number,
                    ":registered": STATUS_REGISTERED,
                },
            )
            .map_err(|err| storage_error("parcel_set_address", err))?;

        debug!(
            "event=parcel_set_address module=repo status=ok number={} changed={}",
            number, changed
        );
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM parcel WHERE number = :number AND status = :registered;",
                named_params! { ":number": number, ":registered": STATUS_REGISTERED },
            )
            .map_err(|err| storage_error("parcel_delete", err))?;

        debug!(
            "event=parcel_delete module=repo status=ok number={} changed={}",
            number, changed
        );
        Ok(())
    }
}

fn parse_parcel_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get("number")?,
        client: row.get("client")?,
        status: row.get("status")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn storage_error(event: &'static str, err: rusqlite::Error) -> RepoError {
    error!("event={event} module=repo status=error error={err}");
    err.into()
}

//! Parcel store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract for parcels (`ParcelStore`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every implementation enforces the `registered` guard on address
//!   changes and deletion, and reports guarded misses as success.
//! - Storage failures surface as `RepoError::Db` with the driver error as
//!   source.

pub mod memory_repo;
pub mod parcel_repo;

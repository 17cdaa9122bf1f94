//! Domain model for parcel tracking.
//!
//! # Responsibility
//! - Define the parcel record and its lifecycle statuses.
//!
//! # Invariants
//! - Every persisted parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod parcel;

//! Core persistence and use-case logic for parcel tracking.
//! This crate is the single source of truth for parcel lifecycle rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{
    ClientId, Parcel, ParcelNumber, ParcelStatus, STATUS_DELIVERED, STATUS_REGISTERED,
    STATUS_SENT,
};
pub use repo::memory_repo::InMemoryParcelStore;
pub use repo::parcel_repo::{ParcelStore, RepoError, RepoResult, SqliteParcelStore};
pub use service::parcel_service::ParcelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

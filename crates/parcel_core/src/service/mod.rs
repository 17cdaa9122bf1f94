//! Use-case services built on top of repository contracts.

pub mod parcel_service;

//! `parcel` table definition.
//!
//! The script only uses `IF NOT EXISTS`, so applying it to a database that
//! already holds parcels leaves rows untouched.

use super::DbResult;
use rusqlite::Connection;

const PARCEL_SCHEMA_SQL: &str = include_str!("parcel.sql");

/// Creates the `parcel` table and its client index when missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(PARCEL_SCHEMA_SQL)?;
    Ok(())
}

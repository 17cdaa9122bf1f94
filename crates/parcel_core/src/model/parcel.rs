//! Parcel domain model.
//!
//! # Responsibility
//! - Define the record persisted in the `parcel` table.
//! - Name the known lifecycle statuses and their progression.
//!
//! # Invariants
//! - `number` is assigned by the store and never chosen by callers.
//! - `status` is stored as an opaque string; only the service layer
//!   interprets it through `ParcelStatus`.
//! - `address` may change only while `status == "registered"`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned parcel identifier (mirrors the table's rowid).
pub type ParcelNumber = i64;

/// Identifier of the client owning a parcel.
pub type ClientId = i64;

/// Initial status. Address edits and deletion are allowed only here.
pub const STATUS_REGISTERED: &str = "registered";
/// Parcel has left the sender.
pub const STATUS_SENT: &str = "sent";
/// Terminal status.
pub const STATUS_DELIVERED: &str = "delivered";

/// Known parcel lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted, not yet shipped.
    Registered,
    /// In transit.
    Sent,
    /// Handed over to the recipient.
    Delivered,
}

impl ParcelStatus {
    /// Returns the persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => STATUS_REGISTERED,
            Self::Sent => STATUS_SENT,
            Self::Delivered => STATUS_DELIVERED,
        }
    }

    /// Parses a persisted status string. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            STATUS_REGISTERED => Some(Self::Registered),
            STATUS_SENT => Some(Self::Sent),
            STATUS_DELIVERED => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns the following lifecycle state, or `None` when terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

/// Canonical parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// `0` until the record has been persisted.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: String,
    pub address: String,
    /// RFC3339 timestamp captured at creation.
    pub created_at: String,
}

impl Parcel {
    /// Creates a not-yet-persisted parcel in `registered` status stamped
    /// with the current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: STATUS_REGISTERED.to_string(),
            address: address.into(),
            created_at: now_rfc3339(),
        }
    }

    /// Returns whether address edits and deletion are currently allowed.
    pub fn is_registered(&self) -> bool {
        self.status == STATUS_REGISTERED
    }
}

/// Current UTC time as RFC3339 with second precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::{Parcel, ParcelStatus, STATUS_REGISTERED};
    use chrono::DateTime;

    #[test]
    fn new_parcel_starts_registered_and_unpersisted() {
        let parcel = Parcel::new(1000, "test");
        assert_eq!(parcel.number, 0);
        assert_eq!(parcel.status, STATUS_REGISTERED);
        assert!(parcel.is_registered());
        assert!(DateTime::parse_from_rfc3339(&parcel.created_at).is_ok());
        assert!(parcel.created_at.ends_with('Z'));
    }

    #[test]
    fn status_progression_stops_at_delivered() {
        assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
        assert_eq!(ParcelStatus::Delivered.next(), None);
    }

    #[test]
    fn status_parse_matches_as_str_and_rejects_unknown() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ] {
            assert_eq!(ParcelStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ParcelStatus::parse("lost"), None);
        assert_eq!(ParcelStatus::parse("Registered"), None);
    }
}

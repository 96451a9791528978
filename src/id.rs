//! Record identifiers - opaque unique strings for devices, staff and wards
//!
//! Format: `<unix-millis>-<8 hex chars>`
//!
//! Examples:
//! - `1722871460123-a3f09c1d`
//! - `1722871460124-4be277d0`
//!
//! Clients treat these as opaque; the format is not part of the API
//! contract, only uniqueness is.

use chrono::Utc;
use uuid::Uuid;

/// Generate a fresh record id.
///
/// Millisecond timestamp plus a random suffix, collision-free for
/// practical purposes.
pub fn new_record_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &suffix[..8])
}

/// Current timestamp as an RFC 3339 string.
///
/// Stored as TEXT; history ordering relies on the lexicographic ordering
/// of these strings matching chronological ordering.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

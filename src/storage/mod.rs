//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - devices(id, name, serial_number, asset_id, status, assigned_to, staff_member, ward, checkout_time, checkout_notes, date_added)
//! - device_history(device_id, kind, timestamp, pupil, staff, ward, notes)
//! - staff(id, name, role)
//! - wards(id, name)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};

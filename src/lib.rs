//! # Kitlog - Device checkout/check-in tracker
//!
//! Records devices (e.g. laptops), staff members, wards and an append-only
//! history of checkout/check-in events, exposed as an HTTP/JSON API over a
//! SQLite store.
//!
//! Kitlog provides:
//! - Four persisted record types: devices, device history, staff, wards
//! - An audit-trail row appended on every device status change
//! - SQLite-backed storage with WAL and a configurable journal mode
//! - An axum server mapping each request to one or two SQL statements

pub mod config;
pub mod id;
pub mod model;
pub mod server;
pub mod storage;

// Re-exports for convenient access
pub use model::{Device, HistoryEntry, HistoryKind, StaffMember, Ward};
pub use storage::SqliteStore;

/// Result type alias for Kitlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Kitlog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

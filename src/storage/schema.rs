//! Database schema definitions

/// SQL to create the devices table
pub const CREATE_DEVICES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS devices (
    id TEXT PRIMARY KEY,
    name TEXT,
    serial_number TEXT,
    asset_id TEXT,
    status TEXT,
    assigned_to TEXT,
    staff_member TEXT,
    ward TEXT,
    checkout_time TEXT,
    checkout_notes TEXT,
    date_added TEXT NOT NULL
)
"#;

/// SQL to create the device_history table
/// Append-only; rows are never updated or deleted, and deleting a device
/// does not cascade here.
pub const CREATE_DEVICE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS device_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    pupil TEXT,
    staff TEXT,
    ward TEXT,
    notes TEXT
)
"#;

/// SQL to create the staff table
pub const CREATE_STAFF_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS staff (
    id TEXT PRIMARY KEY,
    name TEXT,
    role TEXT
)
"#;

/// SQL to create the wards table
pub const CREATE_WARDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wards (
    id TEXT PRIMARY KEY,
    name TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_history_device ON device_history(device_id)",
    "CREATE INDEX IF NOT EXISTS idx_history_timestamp ON device_history(timestamp)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_DEVICES_TABLE,
        CREATE_DEVICE_HISTORY_TABLE,
        CREATE_STAFF_TABLE,
        CREATE_WARDS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params};
use crate::{Result, Error};
use crate::config::JournalMode;
use crate::id;
use crate::model::{Device, DeviceUpdate, HistoryEntry, HistoryKind, StaffMember, Ward};
use super::schema;

/// Busy-timeout applied to every connection, in milliseconds.
/// Concurrent writers queue behind this wait budget rather than erroring.
const BUSY_TIMEOUT_MS: u32 = 5_000;

const DEVICE_COLUMNS: &str = "id, name, serial_number, asset_id, status, assigned_to, staff_member, ward, checkout_time, checkout_notes, date_added";
const HISTORY_COLUMNS: &str = "id, device_id, kind, timestamp, pupil, staff, ward, notes";

/// SQLite-backed store for devices, device history, staff and wards
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist), WAL journal mode
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_mode(path, JournalMode::Wal)
    }

    /// Open a database file with an explicit journal mode.
    ///
    /// `JournalMode::Delete` exists for storage drivers that cannot handle
    /// WAL side files.
    pub fn open_with_mode(path: &Path, mode: JournalMode) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.apply_pragmas(mode)?;
        store.initialize_schema()?;
        tracing::info!("Opened database at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn apply_pragmas(&self, mode: JournalMode) -> Result<()> {
        self.conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = {};",
            BUSY_TIMEOUT_MS,
            mode.pragma_value()
        ))?;
        if mode == JournalMode::Wal {
            self.conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        }
        Ok(())
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Device Operations ==========

    /// List all devices, unordered
    pub fn list_devices(&self) -> Result<Vec<Device>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM devices", DEVICE_COLUMNS))?;

        let devices = stmt
            .query_map([], |row| self.row_to_device(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(devices)
    }

    /// Insert a device row
    pub fn insert_device(&self, device: &Device) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO devices (id, name, serial_number, asset_id, status, assigned_to, staff_member, ward, checkout_time, checkout_notes, date_added)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                device.id,
                device.name,
                device.serial_number,
                device.asset_id,
                device.status,
                device.assigned_to,
                device.staff_member,
                device.ward,
                device.checkout_time,
                device.checkout_notes,
                device.date_added,
            ],
        )?;
        tracing::debug!("Inserted device {}", device.id);
        Ok(())
    }

    /// Apply a checkout/check-in update to a device and append the matching
    /// history row, committed as one transaction.
    ///
    /// Overwrites the five submitted fields plus `checkout_time`
    /// unconditionally; a missing device id is a zero-row update, not an
    /// error, and the history row is appended regardless.
    pub fn update_device(&mut self, device_id: &str, update: &DeviceUpdate) -> Result<HistoryEntry> {
        let timestamp = id::now_timestamp();
        let entry = HistoryEntry::for_update(device_id, update, &timestamp);

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            UPDATE devices
            SET status = ?1, assigned_to = ?2, staff_member = ?3, ward = ?4, checkout_notes = ?5, checkout_time = ?6
            WHERE id = ?7
            "#,
            params![
                update.status,
                update.assigned_to,
                update.staff_member,
                update.ward,
                update.checkout_notes,
                timestamp,
                device_id,
            ],
        )?;
        tx.execute(
            r#"
            INSERT INTO device_history (device_id, kind, timestamp, pupil, staff, ward, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.device_id,
                entry.kind.as_str(),
                entry.timestamp,
                entry.pupil,
                entry.staff,
                entry.ward,
                entry.notes,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!("Updated device {} ({})", device_id, entry.kind);
        Ok(HistoryEntry { id, ..entry })
    }

    /// Delete a device row. History is left untouched; deleting an unknown
    /// id affects zero rows and is not an error.
    pub fn delete_device(&self, device_id: &str) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM devices WHERE id = ?1", [device_id])?;
        tracing::debug!("Deleted device {} ({} rows)", device_id, affected);
        Ok(affected)
    }

    /// Count all devices
    pub fn count_devices(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Device
    fn row_to_device(&self, row: &rusqlite::Row) -> rusqlite::Result<Device> {
        Ok(Device {
            id: row.get(0)?,
            name: row.get(1)?,
            serial_number: row.get(2)?,
            asset_id: row.get(3)?,
            status: row.get(4)?,
            assigned_to: row.get(5)?,
            staff_member: row.get(6)?,
            ward: row.get(7)?,
            checkout_time: row.get(8)?,
            checkout_notes: row.get(9)?,
            date_added: row.get(10)?,
        })
    }

    // ========== History Operations ==========

    /// All history rows for a device, newest first.
    ///
    /// Timestamps are RFC 3339 strings, so the lexicographic DESC order is
    /// chronological.
    pub fn device_history(&self, device_id: &str) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM device_history WHERE device_id = ?1 ORDER BY timestamp DESC",
            HISTORY_COLUMNS
        ))?;

        let entries = stmt
            .query_map([device_id], |row| self.row_to_history(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count all history rows
    pub fn count_history(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM device_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a HistoryEntry
    fn row_to_history(&self, row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
        let kind_str: String = row.get(2)?;
        let kind: HistoryKind = kind_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(HistoryEntry {
            id: row.get(0)?,
            device_id: row.get(1)?,
            kind,
            timestamp: row.get(3)?,
            pupil: row.get(4)?,
            staff: row.get(5)?,
            ward: row.get(6)?,
            notes: row.get(7)?,
        })
    }

    // ========== Staff Operations ==========

    /// List all staff members, unordered
    pub fn list_staff(&self) -> Result<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare("SELECT id, name, role FROM staff")?;

        let staff = stmt
            .query_map([], |row| self.row_to_staff(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(staff)
    }

    /// Insert a staff member
    pub fn insert_staff(&self, member: &StaffMember) -> Result<()> {
        self.conn.execute(
            "INSERT INTO staff (id, name, role) VALUES (?1, ?2, ?3)",
            params![member.id, member.name, member.role],
        )?;
        tracing::debug!("Inserted staff member {}", member.id);
        Ok(())
    }

    /// Delete a staff member; zero rows affected is not an error
    pub fn delete_staff(&self, staff_id: &str) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM staff WHERE id = ?1", [staff_id])?;
        Ok(affected)
    }

    /// Count all staff members
    pub fn count_staff(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM staff", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_staff(&self, row: &rusqlite::Row) -> rusqlite::Result<StaffMember> {
        Ok(StaffMember {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
        })
    }

    // ========== Ward Operations ==========

    /// List all wards, unordered
    pub fn list_wards(&self) -> Result<Vec<Ward>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM wards")?;

        let wards = stmt
            .query_map([], |row| self.row_to_ward(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(wards)
    }

    /// Insert a ward
    pub fn insert_ward(&self, ward: &Ward) -> Result<()> {
        self.conn.execute(
            "INSERT INTO wards (id, name) VALUES (?1, ?2)",
            params![ward.id, ward.name],
        )?;
        tracing::debug!("Inserted ward {}", ward.id);
        Ok(())
    }

    /// Delete a ward; zero rows affected is not an error
    pub fn delete_ward(&self, ward_id: &str) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM wards WHERE id = ?1", [ward_id])?;
        Ok(affected)
    }

    /// Count all wards
    pub fn count_wards(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM wards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_ward(&self, row: &rusqlite::Row) -> rusqlite::Result<Ward> {
        Ok(Ward {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    // ========== Seeding & Stats ==========

    /// Insert sample records into any table that is still empty: one
    /// device, two staff members, two wards. Returns true if anything was
    /// inserted.
    pub fn seed_sample_data(&self) -> Result<bool> {
        let mut seeded = false;

        if self.count_devices()? == 0 {
            self.insert_device(&Device::from_payload(crate::model::NewDevice {
                name: Some("Demo Laptop".to_string()),
                serial_number: Some("SN-DEMO-001".to_string()),
                asset_id: Some("ASSET-001".to_string()),
            }))?;
            seeded = true;
        }

        if self.count_staff()? == 0 {
            for (name, role) in [("Alex Morgan", "Teacher"), ("Sam Reid", "IT Support")] {
                self.insert_staff(&StaffMember {
                    id: id::new_record_id(),
                    name: Some(name.to_string()),
                    role: Some(role.to_string()),
                })?;
            }
            seeded = true;
        }

        if self.count_wards()? == 0 {
            for name in ["North Ward", "South Ward"] {
                self.insert_ward(&Ward {
                    id: id::new_record_id(),
                    name: Some(name.to_string()),
                })?;
            }
            seeded = true;
        }

        if seeded {
            tracing::info!("Seeded sample records");
        }
        Ok(seeded)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            devices: self.count_devices()?,
            history: self.count_history()?,
            staff: self.count_staff()?,
            wards: self.count_wards()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub devices: usize,
    pub history: usize,
    pub staff: usize,
    pub wards: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Devices: {}", self.devices)?;
        writeln!(f, "  History entries: {}", self.history)?;
        writeln!(f, "  Staff: {}", self.staff)?;
        writeln!(f, "  Wards: {}", self.wards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewDevice;

    fn sample_device(name: &str) -> Device {
        Device::from_payload(NewDevice {
            name: Some(name.to_string()),
            serial_number: Some(format!("SN-{}", name)),
            asset_id: Some(format!("A-{}", name)),
        })
    }

    fn checkout_update(assignee: &str) -> DeviceUpdate {
        DeviceUpdate {
            status: Some("checked-out".to_string()),
            assigned_to: Some(assignee.to_string()),
            staff_member: Some("Alex Morgan".to_string()),
            ward: Some("North Ward".to_string()),
            checkout_notes: Some("overnight".to_string()),
        }
    }

    fn checkin_update() -> DeviceUpdate {
        DeviceUpdate {
            status: Some("available".to_string()),
            ..DeviceUpdate::default()
        }
    }

    #[test]
    fn test_device_insert_and_list() {
        let store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();

        let devices = store.list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, device.id);
        assert_eq!(devices[0].name.as_deref(), Some("laptop-1"));
        assert_eq!(devices[0].status.as_deref(), Some("available"));
        assert_eq!(devices[0].date_added, device.date_added);
    }

    #[test]
    fn test_device_with_missing_fields_persists_nulls() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert_device(&Device::from_payload(NewDevice::default()))
            .unwrap();

        let devices = store.list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].name.is_none());
        assert!(devices[0].serial_number.is_none());
        assert!(devices[0].asset_id.is_none());
    }

    #[test]
    fn test_checkout_appends_checkout_history() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();

        let entry = store
            .update_device(&device.id, &checkout_update("Jamie P"))
            .unwrap();
        assert_eq!(entry.kind, HistoryKind::Checkout);
        assert!(entry.id > 0);

        let devices = store.list_devices().unwrap();
        assert_eq!(devices[0].status.as_deref(), Some("checked-out"));
        assert_eq!(devices[0].assigned_to.as_deref(), Some("Jamie P"));
        assert!(devices[0].checkout_time.is_some());

        let history = store.device_history(&device.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, HistoryKind::Checkout);
        assert_eq!(history[0].pupil.as_deref(), Some("Jamie P"));
        assert_eq!(history[0].staff.as_deref(), Some("Alex Morgan"));
    }

    #[test]
    fn test_checkin_appends_checkin_history() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();

        store
            .update_device(&device.id, &checkout_update("Jamie P"))
            .unwrap();
        store.update_device(&device.id, &checkin_update()).unwrap();

        let history = store.device_history(&device.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, HistoryKind::Checkin);
        assert_eq!(history[1].kind, HistoryKind::Checkout);

        // The check-in body carried no assignee, so the stored fields were
        // overwritten with NULL
        let devices = store.list_devices().unwrap();
        assert_eq!(devices[0].status.as_deref(), Some("available"));
        assert!(devices[0].assigned_to.is_none());
        assert!(devices[0].checkout_notes.is_none());
    }

    #[test]
    fn test_history_is_newest_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();

        for i in 0..4 {
            store
                .update_device(&device.id, &checkout_update(&format!("pupil-{}", i)))
                .unwrap();
            // Distinct timestamps so the DESC order is observable
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let history = store.device_history(&device.id).unwrap();
        assert_eq!(history.len(), 4);
        for pair in history.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
        assert_eq!(history[0].pupil.as_deref(), Some("pupil-3"));
        assert_eq!(history[3].pupil.as_deref(), Some("pupil-0"));
    }

    #[test]
    fn test_update_unknown_device_still_appends_history() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let entry = store
            .update_device("no-such-id", &checkout_update("Jamie P"))
            .unwrap();
        assert_eq!(entry.device_id, "no-such-id");

        assert_eq!(store.list_devices().unwrap().len(), 0);
        assert_eq!(store.device_history("no-such-id").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_device_keeps_history() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();
        store
            .update_device(&device.id, &checkout_update("Jamie P"))
            .unwrap();

        assert_eq!(store.delete_device(&device.id).unwrap(), 1);
        assert_eq!(store.list_devices().unwrap().len(), 0);

        let history = store.device_history(&device.id).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.delete_device("missing").unwrap(), 0);
        assert_eq!(store.delete_device("missing").unwrap(), 0);
        assert_eq!(store.delete_staff("missing").unwrap(), 0);
        assert_eq!(store.delete_ward("missing").unwrap(), 0);
    }

    #[test]
    fn test_staff_crud() {
        let store = SqliteStore::open_in_memory().unwrap();

        let member = StaffMember::from_payload(crate::model::NewStaffMember {
            name: Some("Alex Morgan".to_string()),
            role: Some("Teacher".to_string()),
        });
        store.insert_staff(&member).unwrap();

        let staff = store.list_staff().unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].role.as_deref(), Some("Teacher"));

        assert_eq!(store.delete_staff(&member.id).unwrap(), 1);
        assert_eq!(store.list_staff().unwrap().len(), 0);
    }

    #[test]
    fn test_ward_crud() {
        let store = SqliteStore::open_in_memory().unwrap();

        let ward = Ward::from_payload(crate::model::NewWard {
            name: Some("North Ward".to_string()),
        });
        store.insert_ward(&ward).unwrap();

        let wards = store.list_wards().unwrap();
        assert_eq!(wards.len(), 1);

        assert_eq!(store.delete_ward(&ward.id).unwrap(), 1);
        assert_eq!(store.list_wards().unwrap().len(), 0);
    }

    #[test]
    fn test_seed_only_fills_empty_tables() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert!(store.seed_sample_data().unwrap());
        assert_eq!(store.count_devices().unwrap(), 1);
        assert_eq!(store.count_staff().unwrap(), 2);
        assert_eq!(store.count_wards().unwrap(), 2);

        // Second run finds nothing to do
        assert!(!store.seed_sample_data().unwrap());
        assert_eq!(store.count_devices().unwrap(), 1);
    }

    #[test]
    fn test_stats() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let device = sample_device("laptop-1");
        store.insert_device(&device).unwrap();
        store
            .update_device(&device.id, &checkout_update("Jamie P"))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.devices, 1);
        assert_eq!(stats.history, 1);
        assert_eq!(stats.staff, 0);
        assert_eq!(stats.wards, 0);
    }
}

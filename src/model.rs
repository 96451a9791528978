//! Record types - the four persisted entities
//!
//! All wire contracts are camelCase JSON:
//! - `Device`: a trackable asset with a checkout lifecycle
//! - `HistoryEntry`: an immutable audit record of one checkout or check-in
//! - `StaffMember`: a named person with a role
//! - `Ward`: a named location/unit
//!
//! Request bodies are separate payload types. None of the payload fields
//! are required server-side; absent fields persist as SQL NULL.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{id, Error, Result};

/// Status value a freshly added device always carries.
pub const STATUS_AVAILABLE: &str = "available";

/// Direction of a device status change.
///
/// Derived from the submitted status: `available` means the device came
/// back, anything else means it went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Device went out to an assignee
    Checkout,
    /// Device came back
    Checkin,
}

impl HistoryKind {
    /// Get the string representation of the history kind
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Checkout => "checkout",
            HistoryKind::Checkin => "checkin",
        }
    }

    /// Classify a submitted status value. Only an exact `available` counts
    /// as a check-in; anything else, including a missing status, is a
    /// checkout.
    pub fn from_status(status: Option<&str>) -> Self {
        if status == Some(STATUS_AVAILABLE) {
            HistoryKind::Checkin
        } else {
            HistoryKind::Checkout
        }
    }
}

impl FromStr for HistoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "checkout" => Ok(HistoryKind::Checkout),
            "checkin" => Ok(HistoryKind::Checkin),
            _ => Err(Error::InvalidRecord(format!("Unknown history kind: {}", s))),
        }
    }
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A trackable device.
///
/// `id`, `status` and `dateAdded` are generated server-side; the
/// checkout-related fields stay empty until the device is checked out at
/// least once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub asset_id: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub staff_member: Option<String>,
    pub ward: Option<String>,
    pub checkout_time: Option<String>,
    pub checkout_notes: Option<String>,
    pub date_added: String,
}

impl Device {
    /// Construct a device from an add-device payload.
    ///
    /// Generates the id and creation timestamp and forces the status to
    /// `available`, ignoring anything the client sent.
    pub fn from_payload(payload: NewDevice) -> Self {
        Self {
            id: id::new_record_id(),
            name: payload.name,
            serial_number: payload.serial_number,
            asset_id: payload.asset_id,
            status: Some(STATUS_AVAILABLE.to_string()),
            assigned_to: None,
            staff_member: None,
            ward: None,
            checkout_time: None,
            checkout_notes: None,
            date_added: id::now_timestamp(),
        }
    }
}

/// Body of `POST /api/devices`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub asset_id: Option<String>,
}

/// Body of `PUT /api/devices/{id}`.
///
/// Every field overwrites the stored value unconditionally, including a
/// missing one overwriting with NULL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub staff_member: Option<String>,
    pub ward: Option<String>,
    pub checkout_notes: Option<String>,
}

/// One immutable audit record of a checkout or check-in event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub device_id: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub timestamp: String,
    pub pupil: Option<String>,
    pub staff: Option<String>,
    pub ward: Option<String>,
    pub notes: Option<String>,
}

impl HistoryEntry {
    /// Build the audit row for a device update (id assigned by the store).
    pub fn for_update(device_id: &str, update: &DeviceUpdate, timestamp: &str) -> Self {
        Self {
            id: 0,
            device_id: device_id.to_string(),
            kind: HistoryKind::from_status(update.status.as_deref()),
            timestamp: timestamp.to_string(),
            pupil: update.assigned_to.clone(),
            staff: update.staff_member.clone(),
            ward: update.ward.clone(),
            notes: update.checkout_notes.clone(),
        }
    }
}

/// A staff member. Independent of devices; no reference integrity is
/// enforced against assignments or history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl StaffMember {
    pub fn from_payload(payload: NewStaffMember) -> Self {
        Self {
            id: id::new_record_id(),
            name: payload.name,
            role: payload.role,
        }
    }
}

/// Body of `POST /api/staff`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffMember {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// A named location/unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    pub id: String,
    pub name: Option<String>,
}

impl Ward {
    pub fn from_payload(payload: NewWard) -> Self {
        Self {
            id: id::new_record_id(),
            name: payload.name,
        }
    }
}

/// Body of `POST /api/wards`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWard {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_kind_from_status() {
        assert_eq!(HistoryKind::from_status(Some("available")), HistoryKind::Checkin);
        assert_eq!(HistoryKind::from_status(Some("checked-out")), HistoryKind::Checkout);
        // Free-text statuses all count as going out, as does a missing one
        assert_eq!(HistoryKind::from_status(Some("repair")), HistoryKind::Checkout);
        assert_eq!(HistoryKind::from_status(None), HistoryKind::Checkout);
    }

    #[test]
    fn test_history_kind_roundtrip() {
        for kind in [HistoryKind::Checkout, HistoryKind::Checkin] {
            let parsed: HistoryKind = kind.as_str().parse().unwrap();
            assert_eq!(kind, parsed);
        }
        assert!("returned".parse::<HistoryKind>().is_err());
    }

    #[test]
    fn test_new_device_forces_available() {
        let device = Device::from_payload(NewDevice {
            name: Some("Laptop 12".into()),
            serial_number: Some("SN-0012".into()),
            asset_id: Some("A-0012".into()),
        });
        assert_eq!(device.status.as_deref(), Some(STATUS_AVAILABLE));
        assert!(device.checkout_time.is_none());
        assert!(device.assigned_to.is_none());
        assert!(!device.id.is_empty());
        assert!(!device.date_added.is_empty());
    }

    #[test]
    fn test_new_device_accepts_missing_fields() {
        let payload: NewDevice = serde_json::from_str("{}").unwrap();
        let device = Device::from_payload(payload);
        assert!(device.name.is_none());
        assert!(device.serial_number.is_none());
        assert!(device.asset_id.is_none());
        assert_eq!(device.status.as_deref(), Some(STATUS_AVAILABLE));
    }

    #[test]
    fn test_device_json_is_camel_case() {
        let device = Device::from_payload(NewDevice {
            name: Some("Laptop".into()),
            serial_number: Some("SN-1".into()),
            asset_id: Some("A-1".into()),
        });
        let json = serde_json::to_value(&device).unwrap();
        assert!(json.get("serialNumber").is_some());
        assert!(json.get("assetId").is_some());
        assert!(json.get("dateAdded").is_some());
        assert!(json.get("checkoutTime").is_some());
        assert!(json.get("serial_number").is_none());
    }

    #[test]
    fn test_history_entry_serializes_type_field() {
        let update = DeviceUpdate {
            status: Some("checked-out".into()),
            assigned_to: Some("Jamie P".into()),
            staff_member: Some("R. Okafor".into()),
            ward: Some("Ward 3".into()),
            checkout_notes: Some("charger included".into()),
        };
        let entry = HistoryEntry::for_update("dev-1", &update, "2026-01-01T00:00:00+00:00");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "checkout");
        assert_eq!(json["deviceId"], "dev-1");
        assert_eq!(json["pupil"], "Jamie P");
        assert_eq!(json["staff"], "R. Okafor");
    }

    #[test]
    fn test_device_update_tolerates_empty_body() {
        let update: DeviceUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.status.is_none());
        let entry = HistoryEntry::for_update("dev-1", &update, "2026-01-01T00:00:00+00:00");
        assert_eq!(entry.kind, HistoryKind::Checkout);
        assert!(entry.pupil.is_none());
    }
}

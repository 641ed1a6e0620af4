//! JSON file result store
//!
//! Each slot becomes one pretty-printed JSON document, `<dir>/<stem>.json`,
//! where the stem is derived from the slot name and device serial
//! (e.g. `rx_fe_cal_F5A3C1.json`). Writing a slot replaces the previous file.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::domain::{CalError, CalResult, CalSlot, CalibrationEntry, CalibrationTable};
use crate::ports::TableStore;

/// On-disk layout of a stored calibration table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTable {
    pub name: String,
    pub serial: String,
    /// Seconds since the Unix epoch at write time
    pub timestamp: u64,
    pub rows: Vec<CalibrationEntry>,
}

pub struct JsonTableStore {
    dir: PathBuf,
}

impl JsonTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a slot is written to
    pub fn path_for(&self, slot: &CalSlot) -> CalResult<PathBuf> {
        let serial = sanitize_serial(&slot.serial)?;
        let slot = CalSlot {
            name: slot.name.clone(),
            serial,
        };
        Ok(self.dir.join(format!("{}.json", slot.file_stem())))
    }

    /// Read back a previously stored slot
    pub fn load(&self, slot: &CalSlot) -> CalResult<StoredTable> {
        let path = self.path_for(slot)?;
        let json = std::fs::read_to_string(&path)
            .map_err(|e| CalError::Store(format!("Failed to read '{}': {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| CalError::Store(format!("Failed to parse '{}': {e}", path.display())))
    }
}

impl TableStore for JsonTableStore {
    fn store(&mut self, slot: &CalSlot, table: &CalibrationTable) -> CalResult<()> {
        let path = self.path_for(slot)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CalError::Store(format!("Failed to create '{}': {e}", self.dir.display()))
        })?;

        let document = StoredTable {
            name: slot.name.clone(),
            serial: slot.serial.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            rows: table.entries().to_vec(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| CalError::Store(format!("Serialization error: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| CalError::Store(format!("Failed to write '{}': {e}", path.display())))?;

        log::info!("Stored {} calibration rows in {}", table.len(), path.display());
        Ok(())
    }
}

/// Reject serials that could escape the store directory.
/// Only alphanumerics, hyphens and underscores survive into a file name.
fn sanitize_serial(serial: &str) -> CalResult<String> {
    let trimmed = serial.trim();
    if trimmed.is_empty() {
        return Err(CalError::Store("Device serial cannot be empty".to_string()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CalError::Store(format!(
            "Device serial '{trimmed}' contains invalid characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Correction, Frequency, MeasurementResult};

    fn sample_table() -> CalibrationTable {
        let mut table = CalibrationTable::new();
        for (mhz, db) in [(100.0, 41.5), (110.0, 38.25)] {
            table.push(CalibrationEntry::new(
                Frequency::mhz(mhz),
                &MeasurementResult {
                    correction: Correction::new(0.01, -0.05),
                    suppression_db: db,
                },
            ));
        }
        table
    }

    #[test]
    fn store_then_load_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTableStore::new(dir.path().join("cal"));
        let slot = CalSlot::rx("F5A3C1");
        let table = sample_table();

        store.store(&slot, &table).unwrap();
        let loaded = store.load(&slot).unwrap();

        assert_eq!(loaded.name, "RX");
        assert_eq!(loaded.serial, "F5A3C1");
        assert_eq!(loaded.rows, table.entries());
        assert!(dir.path().join("cal/rx_fe_cal_F5A3C1.json").exists());
    }

    #[test]
    fn storing_again_replaces_the_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTableStore::new(dir.path());
        let slot = CalSlot::rx("ABC");

        store.store(&slot, &sample_table()).unwrap();
        store.store(&slot, &CalibrationTable::new()).unwrap();

        assert!(store.load(&slot).unwrap().rows.is_empty());
    }

    #[test]
    fn sanitize_serial_rejects_path_traversal() {
        assert!(sanitize_serial("../evil").is_err());
        assert!(sanitize_serial("foo/bar").is_err());
        assert!(sanitize_serial("foo\\bar").is_err());
        assert!(sanitize_serial("").is_err());
        assert!(sanitize_serial("  ").is_err());
    }

    #[test]
    fn sanitize_serial_accepts_device_serials() {
        assert_eq!(sanitize_serial("F5A3C1").unwrap(), "F5A3C1");
        assert_eq!(sanitize_serial(" SIM-0001 ").unwrap(), "SIM-0001");
        assert_eq!(sanitize_serial("b200_mini").unwrap(), "b200_mini");
    }

    #[test]
    fn invalid_serial_never_touches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTableStore::new(dir.path().join("never"));
        let result = store.store(&CalSlot::rx("../x"), &sample_table());
        assert!(matches!(result, Err(CalError::Store(_))));
        assert!(!dir.path().join("never").exists());
    }
}

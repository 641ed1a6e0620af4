//! Result store port trait

use crate::domain::{CalResult, CalSlot, CalibrationTable};

/// Persists a finished calibration table under a named slot
pub trait TableStore {
    /// Write the table, replacing anything previously stored in the slot
    fn store(&mut self, slot: &CalSlot, table: &CalibrationTable) -> CalResult<()>;
}

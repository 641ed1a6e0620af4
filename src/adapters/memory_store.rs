//! In-memory result store, for tests and dry runs

use crate::domain::{CalResult, CalSlot, CalibrationTable};
use crate::ports::TableStore;

/// Keeps every write in order instead of persisting it
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    writes: Vec<(CalSlot, CalibrationTable)>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far, oldest first
    pub fn writes(&self) -> &[(CalSlot, CalibrationTable)] {
        &self.writes
    }

    /// Most recent table written to `slot`
    pub fn get(&self, slot: &CalSlot) -> Option<&CalibrationTable> {
        self.writes
            .iter()
            .rev()
            .find(|(s, _)| s == slot)
            .map(|(_, table)| table)
    }
}

impl TableStore for MemoryTableStore {
    fn store(&mut self, slot: &CalSlot, table: &CalibrationTable) -> CalResult<()> {
        log::debug!("Memory store: {} rows for {}", table.len(), slot.file_stem());
        self.writes.push((slot.clone(), table.clone()));
        Ok(())
    }
}

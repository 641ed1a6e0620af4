//! Digital Signal Processing
//!
//! Pure functions for signal processing. No I/O dependencies.

pub mod nco;
pub mod tone;

// Re-export commonly used items
pub use nco::Nco;
pub use tone::{estimate_power_db, POWER_FLOOR_DB};

//! Hardware-facing calibration routines
//!
//! Built only on the `ports` traits:
//! - `setup`: CAL antenna check, rates, gains
//! - `tuning`: paired RX/TX LO tuning with lock polling
//! - `capture`: validated all-or-nothing sample capture
//! - `measure`: one suppression measurement for a correction candidate
//! - `reference_tone`: the background transmit thread and its stop guarantee

pub mod capture;
pub mod measure;
pub mod reference_tone;
pub mod setup;
pub mod tuning;

pub use capture::capture_samples;
pub use measure::measure_suppression;
pub use reference_tone::ReferenceTone;
pub use setup::{prepare_frontend, CAL_ANTENNA};
pub use tuning::tune_rx_and_tx;

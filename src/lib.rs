//! RX Front-end Calibration
//!
//! Measures residual image leakage of an SDR receive front-end and searches,
//! at each LO frequency across its range, for the IQ balance correction that
//! maximizes image suppression. The result is a frequency-indexed table of
//! correction coefficients.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, errors and configuration, no I/O
//! - `dsp/` - Signal processing (pure functions, no I/O)
//! - `search/` - Grid refinement over correction space (pure, no I/O)
//! - `ports/` - Trait definitions for the radio front-end and result store
//! - `frontend/` - Tuning, capture, measurement, reference tone (built on ports)
//! - `sweep/` - Frequency sweep controller and progress reporting
//! - `adapters/` - Implementations of ports (simulated radio, JSON store)
//! - `calibrate` - Full calibration run
//! - `cli` - Command-line driver

// Core (pure, no I/O)
pub mod domain;
pub mod dsp;
pub mod ports;
pub mod search;

// Hardware-facing core, built on ports
pub mod frontend;
pub mod sweep;

// Adapters (external I/O)
pub mod adapters;

pub mod calibrate;
pub mod cli;

pub use calibrate::calibrate_rx_frontend;

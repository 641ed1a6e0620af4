//! Calibration configuration
//!
//! A CalibrationConfig holds every tunable value for a calibration run.
//! Defaults match the values the RX front-end calibration utility has always
//! shipped with; a JSON file may override any subset of them.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CalError, CalResult};

/// Grid refinement hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Distinct values per axis in each round (endpoints included)
    pub grid_size: usize,
    /// Number of zoom-in rounds
    pub iterations: usize,
    /// Half-width of the initial window on both axes
    pub half_width: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            grid_size: 5,
            iterations: 7,
            half_width: 0.3,
        }
    }
}

/// LO lock wait timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockTiming {
    /// Unconditional wait after retuning before polling the lock sensors
    pub settle_ms: u64,
    /// Polling budget after the settle delay
    pub timeout_ms: u64,
}

impl LockTiming {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LockTiming {
    fn default() -> Self {
        Self {
            settle_ms: 50,
            timeout_ms: 100,
        }
    }
}

/// Everything a calibration run needs besides the radio and the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Device address args handed to the radio driver
    pub device_args: String,
    /// RX and TX sample rate in Hz
    pub sample_rate: f64,
    /// Reference tone amplitude in counts
    pub tx_wave_ampl: f64,
    /// TX LO offset below the RX LO in Hz
    pub tx_offset: f64,
    /// TX gain in dB
    pub tx_gain: f64,
    /// RX gain in dB
    pub rx_gain: f64,
    /// LO sweep step in Hz
    pub freq_step: f64,
    /// Samples per capture
    pub nsamps: usize,
    /// Per-frequency progress lines instead of dots
    pub verbose: bool,
    /// Margin excluded from both ends of the tunable range, in Hz
    pub guard_band: f64,
    /// Minimum suppression (dB) for a point to enter the table
    pub acceptance_threshold_db: f64,
    pub search: SearchParams,
    pub lock: LockTiming,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            device_args: String::new(),
            sample_rate: 12.5e6,
            tx_wave_ampl: 0.7,
            tx_offset: 0.9344e6,
            tx_gain: 0.0,
            rx_gain: 0.0,
            freq_step: 10e6,
            nsamps: 10_000,
            verbose: false,
            guard_band: 50e6,
            acceptance_threshold_db: 30.0,
            search: SearchParams::default(),
            lock: LockTiming::default(),
        }
    }
}

impl CalibrationConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> CalResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CalError::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            CalError::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Reject values the sweep or the search cannot run with
    pub fn validate(&self) -> CalResult<()> {
        if !(self.sample_rate > 0.0) {
            return Err(CalError::Config(format!(
                "Sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !(self.freq_step > 0.0) {
            return Err(CalError::Config(format!(
                "Frequency step must be positive, got {}",
                self.freq_step
            )));
        }
        if self.nsamps == 0 {
            return Err(CalError::Config("Samples per capture must be non-zero".into()));
        }
        if !(self.guard_band >= 0.0) {
            return Err(CalError::Config(format!(
                "Guard band cannot be negative, got {}",
                self.guard_band
            )));
        }
        if self.search.grid_size < 2 {
            return Err(CalError::Config(format!(
                "Search grid needs at least 2 points per axis, got {}",
                self.search.grid_size
            )));
        }
        if self.search.iterations == 0 {
            return Err(CalError::Config("Search needs at least one iteration".into()));
        }
        if !(self.search.half_width > 0.0) {
            return Err(CalError::Config(format!(
                "Search half-width must be positive, got {}",
                self.search.half_width
            )));
        }
        Ok(())
    }
}

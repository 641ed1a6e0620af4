//! Core domain types

use std::f64::consts::TAU;

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

/// Baseband sample type (complex 32-bit float, "fc32")
pub type IqSample = Complex32;

/// Frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Frequency(pub f64);

impl Frequency {
    pub fn hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }

    pub fn as_mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }
}

/// Tunable LO range reported by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub start: Frequency,
    pub stop: Frequency,
}

impl FrequencyRange {
    pub fn new(start_hz: f64, stop_hz: f64) -> Self {
        Self {
            start: Frequency::hz(start_hz),
            stop: Frequency::hz(stop_hz),
        }
    }
}

/// One capture worth of complex baseband samples.
///
/// Each capture produces a fresh block; blocks are never shared between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBlock(Vec<IqSample>);

impl SampleBlock {
    pub fn new(samples: Vec<IqSample>) -> Self {
        Self(samples)
    }

    pub fn as_slice(&self) -> &[IqSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<IqSample>> for SampleBlock {
    fn from(samples: Vec<IqSample>) -> Self {
        Self(samples)
    }
}

/// IQ-imbalance correction candidate, identified by its search coordinates.
///
/// `phase` is a fraction of a full turn and `amplitude` a fractional gain error;
/// the coefficient handed to the radio is `polar(1 + amplitude, phase * tau)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    phase: f64,
    amplitude: f64,
}

impl Correction {
    pub fn new(phase: f64, amplitude: f64) -> Self {
        Self { phase, amplitude }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Complex coefficient for the radio's IQ balance register
    pub fn coefficient(&self) -> Complex64 {
        Complex64::from_polar(1.0 + self.amplitude, self.phase * TAU)
    }
}

/// A single grid evaluation: the candidate and the suppression it achieved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    pub correction: Correction,
    pub suppression_db: f64,
}

/// Accepted calibration point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    pub frequency_hz: f64,
    pub correction_real: f64,
    pub correction_imag: f64,
    pub suppression_db: f64,
}

impl CalibrationEntry {
    pub fn new(frequency: Frequency, best: &MeasurementResult) -> Self {
        let coefficient = best.correction.coefficient();
        Self {
            frequency_hz: frequency.as_hz(),
            correction_real: coefficient.re,
            correction_imag: coefficient.im,
            suppression_db: best.suppression_db,
        }
    }
}

/// Frequency-ordered table of accepted calibration points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    entries: Vec<CalibrationEntry>,
}

impl CalibrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Sweep order is increasing frequency, so the table stays sorted.
    pub fn push(&mut self, entry: CalibrationEntry) {
        debug_assert!(
            self.entries
                .last()
                .map(|last| last.frequency_hz <= entry.frequency_hz)
                .unwrap_or(true),
            "calibration entries must be appended in sweep order"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CalibrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// LO lock sensor readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockStatus {
    pub rx_locked: bool,
    pub tx_locked: bool,
}

impl LockStatus {
    pub fn both_locked(&self) -> bool {
        self.rx_locked && self.tx_locked
    }
}

/// Raw outcome of a device receive call, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureReport {
    pub num_samps: usize,
    /// Device-reported error code, `None` when the capture was clean
    pub error_code: Option<u32>,
}

/// Named calibration slot in the result store (e.g. "RX" for a given serial)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalSlot {
    pub name: String,
    pub serial: String,
}

impl CalSlot {
    pub fn rx(serial: &str) -> Self {
        Self {
            name: "RX".to_string(),
            serial: serial.to_string(),
        }
    }

    /// Storage key, e.g. `rx_fe_cal_F1234`
    pub fn file_stem(&self) -> String {
        format!("{}_fe_cal_{}", self.name.to_lowercase(), self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_correction_is_unity_coefficient() {
        let c = Correction::new(0.0, 0.0).coefficient();
        assert!((c.re - 1.0).abs() < 1e-12);
        assert!(c.im.abs() < 1e-12);
    }

    #[test]
    fn quarter_turn_phase_rotates_to_imaginary_axis() {
        let c = Correction::new(0.25, 0.1).coefficient();
        assert!(c.re.abs() < 1e-12);
        assert!((c.im - 1.1).abs() < 1e-12);
    }

    #[test]
    fn entry_carries_coefficient_components() {
        let best = MeasurementResult {
            correction: Correction::new(0.0, -0.3),
            suppression_db: 42.0,
        };
        let entry = CalibrationEntry::new(Frequency::mhz(150.0), &best);
        assert_eq!(entry.frequency_hz, 150e6);
        assert!((entry.correction_real - 0.7).abs() < 1e-12);
        assert_eq!(entry.suppression_db, 42.0);
    }

    #[test]
    fn rx_slot_file_stem() {
        assert_eq!(CalSlot::rx("F5A3C1").file_stem(), "rx_fe_cal_F5A3C1");
    }
}

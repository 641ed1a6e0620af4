//! Radio front-end port traits

use num_complex::Complex64;

use crate::domain::{CalResult, CaptureReport, Frequency, FrequencyRange, IqSample, LockStatus};

/// Trait for the radio front-end being calibrated.
///
/// Tuning requests never apply a DSP (CORDIC) shift: the LO itself moves, so
/// the reference tone lands at the same baseband offset at every frequency.
pub trait RadioFrontend: Send {
    /// Device serial, used to key the stored calibration table
    fn serial(&self) -> String;

    /// Available receive antenna ports
    fn rx_antennas(&self) -> Vec<String>;

    /// Available transmit antenna ports
    fn tx_antennas(&self) -> Vec<String>;

    fn set_rx_antenna(&mut self, name: &str) -> CalResult<()>;

    fn set_tx_antenna(&mut self, name: &str) -> CalResult<()>;

    fn set_rx_rate(&mut self, rate_hz: f64) -> CalResult<()>;

    fn set_tx_rate(&mut self, rate_hz: f64) -> CalResult<()>;

    /// Actual receive sample rate after any device rounding
    fn rx_rate(&self) -> f64;

    fn set_rx_gain(&mut self, gain_db: f64) -> CalResult<()>;

    fn set_tx_gain(&mut self, gain_db: f64) -> CalResult<()>;

    /// Tunable receive LO range
    fn rx_freq_range(&self) -> FrequencyRange;

    /// Request a receive LO frequency
    fn tune_rx(&mut self, freq: Frequency) -> CalResult<()>;

    /// Request a transmit LO frequency
    fn tune_tx(&mut self, freq: Frequency) -> CalResult<()>;

    /// Actual receive LO frequency
    fn rx_freq(&self) -> Frequency;

    /// Actual transmit LO frequency
    fn tx_freq(&self) -> Frequency;

    /// Read the LO lock sensors
    fn lock_status(&mut self) -> CalResult<LockStatus>;

    /// Load an IQ balance correction coefficient into the receive chain
    fn set_rx_iq_balance(&mut self, correction: Complex64) -> CalResult<()>;

    /// Receive up to `buffer.len()` samples in a single burst.
    ///
    /// Implementations report what happened instead of judging it; the caller
    /// decides whether a short or flagged capture is acceptable.
    fn capture(&mut self, buffer: &mut [IqSample]) -> CalResult<CaptureReport>;

    /// Open a transmit stream that can be moved to a dedicated thread
    fn tx_stream(&mut self) -> CalResult<Box<dyn TxStream>>;
}

/// Transmit side of the front-end, owned by the reference tone thread
pub trait TxStream: Send {
    /// Send a buffer of samples, blocking until the device accepts it
    fn send(&mut self, samples: &[IqSample]) -> CalResult<()>;

    /// Send the end-of-burst marker
    fn end_burst(&mut self) -> CalResult<()>;
}

//! Domain error types

use thiserror::Error;

/// Errors that can occur while calibrating a receive front-end
#[derive(Error, Debug)]
pub enum CalError {
    #[error("Unsupported hardware: {0}")]
    UnsupportedHardware(String),

    #[error("Timed out after {waited_ms} ms waiting for TX and/or RX LO to lock at {mhz:.3} MHz", mhz = .frequency_hz / 1e6)]
    LockTimeout { frequency_hz: f64, waited_ms: u64 },

    #[error("Unexpected capture error code 0x{0:x}")]
    CaptureError(u32),

    #[error("Short read: requested {requested} samples, received {received}")]
    ShortRead { requested: usize, received: usize },

    #[error("Radio error: {0}")]
    Radio(String),

    #[error("Transmit error: {0}")]
    Transmit(String),

    #[error("Result store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for calibration operations
pub type CalResult<T> = Result<T, CalError>;

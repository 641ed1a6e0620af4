//! Single-bin tone power estimation
//!
//! Evaluates one bin of the discrete Fourier transform at an arbitrary
//! normalized frequency (cycles per sample). The result is the RMS level of
//! the tone in dB relative to full scale, so the difference between two calls
//! on the same block is a power ratio.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::domain::IqSample;

/// Returned instead of log(0) when a bin holds no energy
pub const POWER_FLOOR_DB: f64 = -300.0;

/// Estimate the power (dB) of the component at `normalized_freq` in `samples`.
///
/// `normalized_freq` is frequency divided by sample rate; values outside
/// [-0.5, 0.5) alias the way any DFT bin does. The phase reference is
/// recomputed per sample index to avoid drift from a rotating accumulator.
///
/// `samples` must not be empty.
pub fn estimate_power_db(samples: &[IqSample], normalized_freq: f64) -> f64 {
    debug_assert!(!samples.is_empty(), "tone estimation needs at least one sample");

    let omega = -TAU * normalized_freq;
    let sum: Complex64 = samples
        .iter()
        .enumerate()
        .map(|(n, s)| {
            let s = Complex64::new(s.re as f64, s.im as f64);
            s * Complex64::from_polar(1.0, omega * n as f64)
        })
        .sum();

    let mean_sq = sum.norm_sqr() / (samples.len() as f64).powi(2);
    if !(mean_sq > 0.0) || !mean_sq.is_finite() {
        return POWER_FLOOR_DB;
    }
    (10.0 * mean_sq.log10()).max(POWER_FLOOR_DB)
}

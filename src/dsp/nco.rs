//! Numerically Controlled Oscillator

use std::f64::consts::TAU;

use num_complex::Complex32;

/// Complex NCO for synthesizing baseband tones
pub struct Nco {
    phase: f64,
    phase_increment: f64,
}

impl Nco {
    /// Create a new NCO with the given frequency and sample rate.
    /// Negative frequencies rotate clockwise.
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            phase_increment: TAU * frequency / sample_rate,
        }
    }

    /// Generate the next unit-magnitude sample `e^{j phase}`
    pub fn next_complex(&mut self) -> Complex32 {
        let sample = Complex32::new(self.phase.cos() as f32, self.phase.sin() as f32);
        self.phase += self.phase_increment;
        self.wrap_phase();
        sample
    }

    fn wrap_phase(&mut self) {
        self.phase = self.phase.rem_euclid(TAU);
    }
}

//! Simulated front-end for development and testing without hardware.
//!
//! The receive chain has a frequency-dependent IQ imbalance: a tone at `+f`
//! leaks into `-f` with a complex gain that vanishes when the loaded IQ balance
//! coefficient matches the front-end's ideal correction. What's left is a fixed
//! residual image floor.
//!
//! The transmit side is shared state: a `SimTxStream` sending buffers makes the
//! reference tone audible to `capture`, an end-of-burst silences it.
//!
//! Run the CLI against it with:
//!
//!   RUST_LOG=rxcal_lib=debug cargo run -- --verbose
//!
//! Fault injection (`with_*` builders) lets tests exercise every sweep abort path.

use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use num_complex::{Complex32, Complex64};

use crate::domain::{
    CalError, CalResult, CaptureReport, Correction, Frequency, FrequencyRange, IqSample, LockStatus,
};
use crate::dsp::Nco;
use crate::frontend::CAL_ANTENNA;
use crate::ports::{RadioFrontend, TxStream};

/// Tunable range (a wideband transceiver board)
const DEFAULT_RANGE_HZ: (f64, f64) = (50e6, 2.2e9);
/// Default sample rate before `set_rx_rate`
const DEFAULT_RATE_HZ: f64 = 12.5e6;
/// TX→CAL→RX path loss at 0 dB gain
const LOOPBACK_LOSS_DB: f64 = -20.0;
/// How strongly a correction error turns into image leakage
const IMBALANCE_SENSITIVITY: f64 = 0.5;
/// Image leakage the correction cannot remove (-60 dBc)
const RESIDUAL_IMAGE: f64 = 1e-3;
/// Device blocking time per transmitted buffer
const TX_PACING: Duration = Duration::from_micros(200);

/// Everything the simulator tracks, visible to tests through `SimProbe`
#[derive(Debug, Clone)]
pub struct SimState {
    pub rx_antenna: String,
    pub tx_antenna: String,
    pub rx_rate: f64,
    pub tx_rate: f64,
    pub rx_gain: f64,
    pub tx_gain: f64,
    pub rx_freq: f64,
    pub tx_freq: f64,
    pub correction: Complex64,
    /// Amplitude currently on the air, `None` when not transmitting
    pub tx_amplitude: Option<f32>,
    pub buffers_sent: usize,
    pub bursts_ended: usize,
    pub captures: usize,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            rx_antenna: "RX2".to_string(),
            tx_antenna: "TX/RX".to_string(),
            rx_rate: DEFAULT_RATE_HZ,
            tx_rate: DEFAULT_RATE_HZ,
            rx_gain: 0.0,
            tx_gain: 0.0,
            rx_freq: DEFAULT_RANGE_HZ.0,
            tx_freq: DEFAULT_RANGE_HZ.0,
            correction: Complex64::new(1.0, 0.0),
            tx_amplitude: None,
            buffers_sent: 0,
            bursts_ended: 0,
            captures: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Faults {
    lock_failure_from: Option<f64>,
    short_read_on_capture: Option<usize>,
    capture_error_on_capture: Option<(usize, u32)>,
    no_cal_antenna: bool,
}

fn lock_shared(shared: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SimulatedRadio {
    serial: String,
    range: FrequencyRange,
    shared: Arc<Mutex<SimState>>,
    faults: Faults,
}

impl SimulatedRadio {
    pub fn new(serial: &str) -> Self {
        log::info!(
            "[SIM RADIO] Initialized serial={serial} range={:.0}-{:.0} MHz",
            DEFAULT_RANGE_HZ.0 / 1e6,
            DEFAULT_RANGE_HZ.1 / 1e6
        );
        Self {
            serial: serial.to_string(),
            range: FrequencyRange::new(DEFAULT_RANGE_HZ.0, DEFAULT_RANGE_HZ.1),
            shared: Arc::new(Mutex::new(SimState::default())),
            faults: Faults::default(),
        }
    }

    /// Override the tunable range
    pub fn with_range(mut self, range: FrequencyRange) -> Self {
        self.range = range;
        let mut state = lock_shared(&self.shared);
        state.rx_freq = range.start.as_hz();
        state.tx_freq = range.start.as_hz();
        drop(state);
        self
    }

    /// LOs never report lock at or above `freq`
    pub fn with_lock_failure_from(mut self, freq: Frequency) -> Self {
        self.faults.lock_failure_from = Some(freq.as_hz());
        self
    }

    /// The `nth` capture (1-based) delivers only half the requested samples
    pub fn with_short_read_on_capture(mut self, nth: usize) -> Self {
        self.faults.short_read_on_capture = Some(nth);
        self
    }

    /// The `nth` capture (1-based) reports device error `code`
    pub fn with_capture_error_on_capture(mut self, nth: usize, code: u32) -> Self {
        self.faults.capture_error_on_capture = Some((nth, code));
        self
    }

    /// Board without the CAL loopback port
    pub fn without_cal_antenna(mut self) -> Self {
        self.faults.no_cal_antenna = true;
        self
    }

    /// Read-only view of the simulator state that outlives the radio
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Correction that cancels this front-end's imbalance at `freq`
    pub fn optimal_correction(&self, freq: Frequency) -> Correction {
        let x = freq.as_hz();
        let amplitude = -0.08 + 0.04 * (TAU * x / 1.5e9).sin();
        let phase = 0.02 + 0.015 * (TAU * x / 2.2e9).cos();
        Correction::new(phase, amplitude)
    }

    /// Complex gain from the tone into its image for the loaded correction
    fn image_gain(&self, rx_freq: f64, correction: Complex64) -> Complex64 {
        let ideal = self.optimal_correction(Frequency::hz(rx_freq)).coefficient();
        (correction - ideal) * IMBALANCE_SENSITIVITY + RESIDUAL_IMAGE
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        lock_shared(&self.shared)
    }

    fn check_tunable(&self, side: &str, freq: Frequency) -> CalResult<()> {
        let hz = freq.as_hz();
        if hz < self.range.start.as_hz() || hz > self.range.stop.as_hz() {
            return Err(CalError::Radio(format!(
                "{side} frequency {:.3} MHz outside tunable range {:.3}-{:.3} MHz",
                freq.as_mhz(),
                self.range.start.as_mhz(),
                self.range.stop.as_mhz()
            )));
        }
        Ok(())
    }
}

impl RadioFrontend for SimulatedRadio {
    fn serial(&self) -> String {
        self.serial.clone()
    }

    fn rx_antennas(&self) -> Vec<String> {
        let mut antennas = vec!["TX/RX".to_string(), "RX2".to_string()];
        if !self.faults.no_cal_antenna {
            antennas.push(CAL_ANTENNA.to_string());
        }
        antennas
    }

    fn tx_antennas(&self) -> Vec<String> {
        let mut antennas = vec!["TX/RX".to_string()];
        if !self.faults.no_cal_antenna {
            antennas.push(CAL_ANTENNA.to_string());
        }
        antennas
    }

    fn set_rx_antenna(&mut self, name: &str) -> CalResult<()> {
        if !self.rx_antennas().iter().any(|a| a == name) {
            return Err(CalError::Radio(format!("Unknown RX antenna '{name}'")));
        }
        log::debug!("[SIM RADIO] RX antenna → {name}");
        self.state().rx_antenna = name.to_string();
        Ok(())
    }

    fn set_tx_antenna(&mut self, name: &str) -> CalResult<()> {
        if !self.tx_antennas().iter().any(|a| a == name) {
            return Err(CalError::Radio(format!("Unknown TX antenna '{name}'")));
        }
        log::debug!("[SIM RADIO] TX antenna → {name}");
        self.state().tx_antenna = name.to_string();
        Ok(())
    }

    fn set_rx_rate(&mut self, rate_hz: f64) -> CalResult<()> {
        log::debug!("[SIM RADIO] RX rate → {:.3} Msps", rate_hz / 1e6);
        self.state().rx_rate = rate_hz;
        Ok(())
    }

    fn set_tx_rate(&mut self, rate_hz: f64) -> CalResult<()> {
        log::debug!("[SIM RADIO] TX rate → {:.3} Msps", rate_hz / 1e6);
        self.state().tx_rate = rate_hz;
        Ok(())
    }

    fn rx_rate(&self) -> f64 {
        self.state().rx_rate
    }

    fn set_rx_gain(&mut self, gain_db: f64) -> CalResult<()> {
        self.state().rx_gain = gain_db;
        Ok(())
    }

    fn set_tx_gain(&mut self, gain_db: f64) -> CalResult<()> {
        self.state().tx_gain = gain_db;
        Ok(())
    }

    fn rx_freq_range(&self) -> FrequencyRange {
        self.range
    }

    fn tune_rx(&mut self, freq: Frequency) -> CalResult<()> {
        self.check_tunable("RX", freq)?;
        log::debug!("[SIM RADIO] RX LO → {:.3} MHz", freq.as_mhz());
        self.state().rx_freq = freq.as_hz();
        Ok(())
    }

    fn tune_tx(&mut self, freq: Frequency) -> CalResult<()> {
        self.check_tunable("TX", freq)?;
        log::debug!("[SIM RADIO] TX LO → {:.3} MHz", freq.as_mhz());
        self.state().tx_freq = freq.as_hz();
        Ok(())
    }

    fn rx_freq(&self) -> Frequency {
        Frequency::hz(self.state().rx_freq)
    }

    fn tx_freq(&self) -> Frequency {
        Frequency::hz(self.state().tx_freq)
    }

    fn lock_status(&mut self) -> CalResult<LockStatus> {
        let rx_freq = self.state().rx_freq;
        let locked = self
            .faults
            .lock_failure_from
            .map(|limit| rx_freq < limit)
            .unwrap_or(true);
        Ok(LockStatus {
            rx_locked: locked,
            tx_locked: locked,
        })
    }

    fn set_rx_iq_balance(&mut self, correction: Complex64) -> CalResult<()> {
        self.state().correction = correction;
        Ok(())
    }

    fn capture(&mut self, buffer: &mut [IqSample]) -> CalResult<CaptureReport> {
        let mut state = self.state();
        state.captures += 1;
        let nth = state.captures;

        if let Some((at, code)) = self.faults.capture_error_on_capture {
            if at == nth {
                return Ok(CaptureReport {
                    num_samps: 0,
                    error_code: Some(code),
                });
            }
        }
        let delivered = match self.faults.short_read_on_capture {
            Some(at) if at == nth => buffer.len() / 2,
            _ => buffer.len(),
        };

        let path_gain = 10f64.powf((state.tx_gain + state.rx_gain + LOOPBACK_LOSS_DB) / 20.0);
        let amplitude = state.tx_amplitude.map(f64::from).unwrap_or(0.0) * path_gain;
        let image = self.image_gain(state.rx_freq, state.correction);
        let mut nco = Nco::new(state.tx_freq - state.rx_freq, state.rx_rate);
        drop(state);

        for sample in buffer[..delivered].iter_mut() {
            let x = nco.next_complex();
            let x = Complex64::new(x.re as f64, x.im as f64);
            let y = (x + image * x.conj()) * amplitude;
            *sample = Complex32::new(y.re as f32, y.im as f32);
        }

        Ok(CaptureReport {
            num_samps: delivered,
            error_code: None,
        })
    }

    fn tx_stream(&mut self) -> CalResult<Box<dyn TxStream>> {
        log::debug!("[SIM RADIO] TX stream opened");
        Ok(Box::new(SimTxStream {
            shared: Arc::clone(&self.shared),
        }))
    }
}

/// Transmit half of the simulator
pub struct SimTxStream {
    shared: Arc<Mutex<SimState>>,
}

impl TxStream for SimTxStream {
    fn send(&mut self, samples: &[IqSample]) -> CalResult<()> {
        {
            let mut state = lock_shared(&self.shared);
            state.tx_amplitude = Some(samples.first().map(|s| s.norm()).unwrap_or(0.0));
            state.buffers_sent += 1;
        }
        thread::sleep(TX_PACING);
        Ok(())
    }

    fn end_burst(&mut self) -> CalResult<()> {
        let mut state = lock_shared(&self.shared);
        state.tx_amplitude = None;
        state.bursts_ended += 1;
        log::debug!("[SIM RADIO] TX end of burst after {} buffers", state.buffers_sent);
        Ok(())
    }
}

/// Shared handle for inspecting a `SimulatedRadio` after it was moved or dropped
#[derive(Clone)]
pub struct SimProbe {
    shared: Arc<Mutex<SimState>>,
}

impl SimProbe {
    pub fn snapshot(&self) -> SimState {
        lock_shared(&self.shared).clone()
    }
}

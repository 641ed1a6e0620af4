//! Continuous reference tone transmitter
//!
//! The tone runs on its own thread for the whole sweep. The receive side never
//! synchronizes with it; it simply observes whatever is on the air.
//!
//! Lifecycle:
//! 1. `start` spawns the thread and waits until the first buffer is sent
//! 2. The thread keeps sending until a stop signal (or a dropped handle)
//! 3. On the way out it sends an end-of-burst marker
//!
//! `stop` joins the thread and reports transmit failures. Dropping a running
//! `ReferenceTone` does the same, so an early return or panic in the sweep
//! can never leave the radio transmitting.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::domain::{CalError, CalResult, IqSample};
use crate::ports::TxStream;

/// Samples per transmit buffer (ten maximum-size device packets)
pub const DEFAULT_TX_BUFFER_LEN: usize = 10 * 2040;

/// Handle to the running transmit thread
pub struct ReferenceTone {
    stop_signal: Option<Sender<()>>,
    handle: Option<JoinHandle<CalResult<()>>>,
}

impl ReferenceTone {
    /// Start transmitting the constant baseband value `amplitude + 0j`
    pub fn start(stream: Box<dyn TxStream>, amplitude: f64) -> CalResult<Self> {
        Self::start_with_buffer_len(stream, amplitude, DEFAULT_TX_BUFFER_LEN)
    }

    pub fn start_with_buffer_len(
        stream: Box<dyn TxStream>,
        amplitude: f64,
        buffer_len: usize,
    ) -> CalResult<Self> {
        let (stop_signal, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<CalResult<()>>(1);

        let handle = thread::Builder::new()
            .name("rxcal-tx".into())
            .spawn(move || run_tx_thread(stream, amplitude, buffer_len, stop_rx, ready_tx))
            .map_err(|e| CalError::Transmit(format!("Failed to spawn transmit thread: {e}")))?;

        let mut tone = Self {
            stop_signal: Some(stop_signal),
            handle: Some(handle),
        };

        match ready_rx.recv() {
            Ok(Ok(())) => {
                log::info!("Reference tone started (amplitude {amplitude})");
                Ok(tone)
            }
            Ok(Err(e)) => {
                if let Err(stop_err) = tone.shutdown() {
                    log::warn!("Reference tone shutdown after failed start also failed: {stop_err}");
                }
                Err(e)
            }
            Err(_) => {
                // The thread dropped its ready sender without reporting: it panicked
                tone.shutdown()?;
                Err(CalError::Transmit("Transmit thread exited before sending".into()))
            }
        }
    }

    /// True while the transmit thread has not exited
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Signal the thread to stop, wait for the end-of-burst and join it
    pub fn stop(mut self) -> CalResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> CalResult<()> {
        if let Some(stop) = self.stop_signal.take() {
            // A full or disconnected channel means the thread is already leaving
            let _ = stop.try_send(());
        }
        match self.handle.take() {
            Some(handle) => {
                let result = handle
                    .join()
                    .map_err(|_| CalError::Transmit("Transmit thread panicked".into()))?;
                log::info!("Reference tone stopped");
                result
            }
            None => Ok(()),
        }
    }
}

impl Drop for ReferenceTone {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("Reference tone shutdown failed: {e}");
        }
    }
}

/// Transmit thread body: send until told to stop, then close the burst.
fn run_tx_thread(
    mut stream: Box<dyn TxStream>,
    amplitude: f64,
    buffer_len: usize,
    stop: Receiver<()>,
    ready: Sender<CalResult<()>>,
) -> CalResult<()> {
    let buffer = vec![IqSample::new(amplitude as f32, 0.0); buffer_len];

    if let Err(e) = stream.send(&buffer) {
        if let Err(end_err) = stream.end_burst() {
            log::warn!("End of burst after failed first send also failed: {end_err}");
        }
        let _ = ready.send(Err(e));
        return Ok(());
    }
    let _ = ready.send(Ok(()));

    let mut result = Ok(());
    loop {
        match stop.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Disconnected) => break,
        }
        if let Err(e) = stream.send(&buffer) {
            log::error!("Reference tone send failed: {e}");
            result = Err(e);
            break;
        }
    }

    let end = stream.end_burst();
    result.and(end)
}

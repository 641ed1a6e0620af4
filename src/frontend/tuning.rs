//! Paired RX/TX LO tuning with lock confirmation

use std::thread;
use std::time::{Duration, Instant};

use crate::domain::{CalError, CalResult, Frequency, LockTiming};
use crate::ports::RadioFrontend;

/// Pause between lock sensor reads
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tune RX to `rx_lo` and TX to `tx_offset` below the actual RX LO, then wait
/// for both LOs to lock.
///
/// Returns the actual RX LO frequency. A lock that does not arrive within
/// `timing.timeout()` after the settle delay is a `LockTimeout`.
pub fn tune_rx_and_tx(
    radio: &mut dyn RadioFrontend,
    rx_lo: Frequency,
    tx_offset: f64,
    timing: &LockTiming,
) -> CalResult<Frequency> {
    radio.tune_rx(rx_lo)?;
    let tx_lo = Frequency::hz(radio.rx_freq().as_hz() - tx_offset);
    radio.tune_tx(tx_lo)?;

    thread::sleep(timing.settle());
    wait_for_lock(radio, rx_lo, timing.timeout())?;

    let actual = radio.rx_freq();
    log::debug!(
        "Tuned RX {:.3} MHz, TX {:.3} MHz",
        actual.as_mhz(),
        radio.tx_freq().as_mhz()
    );
    Ok(actual)
}

fn wait_for_lock(radio: &mut dyn RadioFrontend, rx_lo: Frequency, timeout: Duration) -> CalResult<()> {
    let start = Instant::now();
    loop {
        if radio.lock_status()?.both_locked() {
            return Ok(());
        }
        if start.elapsed() > timeout {
            return Err(CalError::LockTimeout {
                frequency_hz: rx_lo.as_hz(),
                waited_ms: timeout.as_millis() as u64,
            });
        }
        thread::sleep(LOCK_POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim_radio::SimulatedRadio;

    fn fast_timing() -> LockTiming {
        LockTiming {
            settle_ms: 0,
            timeout_ms: 5,
        }
    }

    #[test]
    fn tx_lo_sits_offset_below_rx_lo() {
        let mut radio = SimulatedRadio::new("SIM1");
        let actual = tune_rx_and_tx(&mut radio, Frequency::mhz(900.0), 0.9344e6, &fast_timing()).unwrap();
        assert_eq!(actual, Frequency::mhz(900.0));
        assert!((radio.tx_freq().as_hz() - (900e6 - 0.9344e6)).abs() < 1e-3);
    }

    #[test]
    fn unlocked_lo_times_out() {
        let mut radio = SimulatedRadio::new("SIM1").with_lock_failure_from(Frequency::mhz(500.0));
        let result = tune_rx_and_tx(&mut radio, Frequency::mhz(600.0), 1e6, &fast_timing());
        match result {
            Err(CalError::LockTimeout {
                frequency_hz,
                waited_ms,
            }) => {
                assert_eq!(frequency_hz, 600e6);
                assert_eq!(waited_ms, 5);
            }
            other => panic!("expected LockTimeout, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_request_is_a_radio_error() {
        let mut radio = SimulatedRadio::new("SIM1");
        let result = tune_rx_and_tx(&mut radio, Frequency::hz(1.0), 1e6, &fast_timing());
        assert!(matches!(result, Err(CalError::Radio(_))));
    }
}

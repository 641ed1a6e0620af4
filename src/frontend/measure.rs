//! Image suppression measurement for one correction candidate

use crate::domain::{CalResult, Correction};
use crate::dsp::estimate_power_db;
use crate::ports::RadioFrontend;

use super::capture::capture_samples;

/// Apply `correction`, capture `nsamps` samples and return tone minus image power in dB.
///
/// The reference tone sits at `tx_lo - rx_lo` in baseband and its image at the
/// negated offset. Both are re-read from the radio on every call so device
/// rounding of the LOs and rate is always reflected.
pub fn measure_suppression(
    radio: &mut dyn RadioFrontend,
    correction: &Correction,
    nsamps: usize,
) -> CalResult<f64> {
    radio.set_rx_iq_balance(correction.coefficient())?;

    let block = capture_samples(radio, nsamps)?;

    let rx_rate = radio.rx_rate();
    let bb_tone_freq = radio.tx_freq().as_hz() - radio.rx_freq().as_hz();
    let bb_image_freq = -bb_tone_freq;

    let tone_db = estimate_power_db(block.as_slice(), bb_tone_freq / rx_rate);
    let image_db = estimate_power_db(block.as_slice(), bb_image_freq / rx_rate);

    log::trace!(
        "phase={:.5} ampl={:.5}: tone {tone_db:.2} dB, image {image_db:.2} dB",
        correction.phase(),
        correction.amplitude()
    );
    Ok(tone_db - image_db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim_radio::SimulatedRadio;
    use crate::domain::{CalError, Frequency, LockTiming};
    use crate::frontend::tuning::tune_rx_and_tx;
    use crate::frontend::ReferenceTone;

    fn tuned_radio() -> SimulatedRadio {
        let mut radio = SimulatedRadio::new("SIM1");
        let timing = LockTiming {
            settle_ms: 0,
            timeout_ms: 5,
        };
        tune_rx_and_tx(&mut radio, Frequency::mhz(1000.0), 0.9344e6, &timing).unwrap();
        radio
    }

    #[test]
    fn optimal_correction_beats_zero_correction() {
        let mut radio = tuned_radio();
        let tone = ReferenceTone::start_with_buffer_len(radio.tx_stream().unwrap(), 0.7, 64).unwrap();

        let optimum = radio.optimal_correction(Frequency::mhz(1000.0));
        let best = measure_suppression(&mut radio, &optimum, 4000).unwrap();
        let none = measure_suppression(&mut radio, &Correction::new(0.0, 0.0), 4000).unwrap();
        tone.stop().unwrap();

        assert!(best > 40.0, "optimum suppression {best}");
        assert!(best > none + 10.0, "optimum {best} vs uncorrected {none}");
    }

    #[test]
    fn silent_transmitter_gives_no_suppression() {
        let mut radio = tuned_radio();
        let s = measure_suppression(&mut radio, &Correction::new(0.0, 0.0), 1000).unwrap();
        assert!(s.is_finite());
        assert!(s.abs() < 1e-9);
    }

    #[test]
    fn capture_failure_propagates() {
        let mut radio = tuned_radio().with_short_read_on_capture(1);
        assert!(matches!(
            measure_suppression(&mut radio, &Correction::new(0.0, 0.0), 100),
            Err(CalError::ShortRead { .. })
        ));
    }
}

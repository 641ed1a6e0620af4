//! Front-end preparation before any streaming starts

use crate::domain::{CalError, CalResult, CalibrationConfig};
use crate::ports::RadioFrontend;

/// Antenna port that loops TX back into RX internally
pub const CAL_ANTENNA: &str = "CAL";

/// Select the CAL loopback on both sides and apply rates and gains.
///
/// Fails with `UnsupportedHardware` before touching any setting when either
/// side lacks the CAL port.
pub fn prepare_frontend(radio: &mut dyn RadioFrontend, config: &CalibrationConfig) -> CalResult<()> {
    let has_cal = |antennas: Vec<String>| antennas.iter().any(|a| a == CAL_ANTENNA);
    if !has_cal(radio.rx_antennas()) || !has_cal(radio.tx_antennas()) {
        return Err(CalError::UnsupportedHardware(
            "This board does not have the CAL antenna option, cannot self-calibrate".into(),
        ));
    }

    radio.set_rx_antenna(CAL_ANTENNA)?;
    radio.set_tx_antenna(CAL_ANTENNA)?;

    radio.set_rx_rate(config.sample_rate)?;
    radio.set_tx_rate(config.sample_rate)?;

    radio.set_tx_gain(config.tx_gain)?;
    radio.set_rx_gain(config.rx_gain)?;

    log::info!(
        "Front-end {} prepared: antenna={CAL_ANTENNA} rate={:.3} Msps tx_gain={} dB rx_gain={} dB",
        radio.serial(),
        radio.rx_rate() / 1e6,
        config.tx_gain,
        config.rx_gain
    );
    Ok(())
}

//! RX front-end calibration run
//!
//! Ties the pieces together:
//! 1. Validate the configuration and prepare the front-end (CAL loopback)
//! 2. Start the reference tone
//! 3. Sweep
//! 4. Stop the reference tone, whether the sweep succeeded or not
//! 5. Hand the table to the store, only if everything succeeded

use crate::domain::{CalResult, CalSlot, CalibrationConfig, CalibrationTable};
use crate::frontend::{prepare_frontend, ReferenceTone};
use crate::ports::{RadioFrontend, TableStore};
use crate::sweep::{SweepController, SweepObserver};

/// Calibrate `radio`'s receive IQ balance and store the table under its "RX" slot.
pub fn calibrate_rx_frontend(
    radio: &mut dyn RadioFrontend,
    store: &mut dyn TableStore,
    config: &CalibrationConfig,
    observer: &mut dyn SweepObserver,
) -> CalResult<CalibrationTable> {
    config.validate()?;
    prepare_frontend(radio, config)?;

    let tone = ReferenceTone::start(radio.tx_stream()?, config.tx_wave_ampl)?;
    let swept = SweepController::new(config).run(radio, observer);
    let stopped = tone.stop();

    let table = match (swept, stopped) {
        (Ok(table), Ok(())) => table,
        (Ok(_), Err(e)) => return Err(e),
        (Err(e), stopped) => {
            if let Err(stop_err) = stopped {
                log::warn!("Reference tone stop also failed: {stop_err}");
            }
            return Err(e);
        }
    };

    let slot = CalSlot::rx(&radio.serial());
    store.store(&slot, &table)?;
    Ok(table)
}
